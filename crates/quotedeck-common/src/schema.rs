use crate::error::{QuoteError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Request input
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A trimmed, upper-cased ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Trim and upper-case raw user input; blank input is a [`QuoteError::Validation`].
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QuoteError::Validation);
        }
        Ok(Symbol(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Provider responses
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Body of `GET /tiingo/daily/<symbol>`.
///
/// ```json
/// {
///     "ticker": "AAPL",
///     "name": "Apple Inc",
///     "exchangeCode": "NASDAQ",
///     "startDate": "1980-12-12",
///     "endDate": "2024-01-05",
///     "description": "Apple Inc. (Apple) designs, manufactures and markets ..."
/// }
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exchange_code: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One record of the `GET /iex/<symbol>` array.
///
/// Price fields are kept as raw JSON so that a value the provider sends as a string (or anything
/// else unexpected) can still be displayed as-is.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawQuote {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub prev_close: Option<Value>,
    #[serde(default)]
    pub last: Option<Value>,
    #[serde(default)]
    pub open: Option<Value>,
    #[serde(default)]
    pub high: Option<Value>,
    #[serde(default)]
    pub low: Option<Value>,
    #[serde(default)]
    pub volume: Option<Value>,
}

impl RawQuote {
    /// The most recent record; the provider lists it first.
    pub fn latest(records: Vec<RawQuote>) -> Result<RawQuote> {
        records.into_iter().next().ok_or(QuoteError::NoData)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Response payloads
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Company metadata, passed through from the provider.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, utoipa::ToSchema)]
pub struct CompanyInfo {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub exchange: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    pub description: Option<String>,
}

impl From<Metadata> for CompanyInfo {
    fn from(meta: Metadata) -> Self {
        CompanyInfo {
            name: meta.name,
            symbol: meta.ticker,
            exchange: meta.exchange_code,
            start_date: meta.start_date,
            description: meta.description,
        }
    }
}

/// Display-ready quote; see [`crate::format`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormattedQuote {
    pub symbol: String,
    pub trading_day: String,
    pub prev_close: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub last: String,
    pub change: String,
    pub change_percent: String,
    pub volume: String,
}

/// `200` body of `/api/stock/<symbol>`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, utoipa::ToSchema)]
pub struct StockPayload {
    pub company_info: CompanyInfo,
    pub stock_summary: FormattedQuote,
}

/// Body of every non-`200` response.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
