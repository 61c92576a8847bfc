use async_trait::async_trait;
use quotedeck_common::{CompanyInfo, RawQuote, Result, Symbol};

/// Source of company metadata and latest quotes.
///
/// The request handler only sees this trait, so the provider can be swapped (or stubbed in tests)
/// without touching the handler. Errors are always one of the domain kinds in
/// [`QuoteError`](quotedeck_common::QuoteError):
///
/// 1. `NotFound` - the provider does not know the symbol.
/// 2. `NoData` - the symbol is known but has no quote records.
/// 3. `Upstream` - anything else that went wrong on the wire.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Company metadata for `symbol`.
    async fn fetch_company_info(&self, symbol: &Symbol) -> Result<CompanyInfo>;

    /// The most recent quote record for `symbol`.
    async fn fetch_latest_quote(&self, symbol: &Symbol) -> Result<RawQuote>;
}
