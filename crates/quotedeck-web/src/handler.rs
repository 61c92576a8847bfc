use crate::session::{Session, LAST_SEARCHED_SYMBOL};
use log::{error, info};
use quotedeck_client::MarketData;
use quotedeck_common::{ErrorBody, FormattedQuote, QuoteError, Result, StockPayload, Symbol};
use serde::Serialize;
use std::sync::Arc;

/// Body of a stock lookup response: the data on success, an error envelope otherwise.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Payload {
    Stock(StockPayload),
    Error(ErrorBody),
}

impl Payload {
    fn error(e: &QuoteError) -> (Payload, u16) {
        let body = ErrorBody {
            error: e.client_message(),
        };
        (Payload::Error(body), e.status())
    }
}

/// Turns a raw symbol into a `(payload, status)` pair.
///
/// 1. trim & validate the input (`400` when blank, without touching the provider)
/// 2. upper-case it and remember it as the session's last searched symbol
/// 3. fetch company info, then the latest quote
/// 4. domain errors (timestamp parsing included) become a `400` envelope; internal errors a generic `500`
#[derive(Clone)]
pub struct RequestHandler {
    market_data: Arc<dyn MarketData>,
}

impl RequestHandler {
    pub fn new(market_data: Arc<dyn MarketData>) -> Self {
        RequestHandler { market_data }
    }

    pub async fn handle(&self, raw_symbol: &str, session: &dyn Session) -> (Payload, u16) {
        let symbol = match Symbol::parse(raw_symbol) {
            Ok(symbol) => symbol,
            Err(e) => return Payload::error(&e),
        };

        session.insert(LAST_SEARCHED_SYMBOL, symbol.to_string());
        info!("Processing request for symbol: {symbol}");

        match self.lookup(&symbol).await {
            Ok(payload) => (Payload::Stock(payload), 200),
            Err(e) => {
                match e.status() {
                    500 => error!("Unexpected error for {symbol}: {e}"),
                    _ => error!("API Error for {symbol}: {e}"),
                }
                Payload::error(&e)
            }
        }
    }

    async fn lookup(&self, symbol: &Symbol) -> Result<StockPayload> {
        // company info first; an unknown symbol fails here before the quote is requested
        let company_info = self.market_data.fetch_company_info(symbol).await?;
        let latest = self.market_data.fetch_latest_quote(symbol).await?;
        let stock_summary = FormattedQuote::from_raw(symbol, &latest)?;

        Ok(StockPayload {
            company_info,
            stock_summary,
        })
    }
}
