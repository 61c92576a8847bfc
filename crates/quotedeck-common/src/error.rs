use thiserror::Error;

/// Message returned to clients in place of any 500-class error detail.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Message returned to clients for a quote whose timestamp cannot be read.
pub const UNREADABLE_TIMESTAMP: &str = "Unable to read the trading day of the latest quote.";

pub type Result<T> = std::result::Result<T, QuoteError>;

/// Every failure a stock lookup can produce.
///
/// The `Display` text of the 400-class variants, `Parse` aside, is exactly what is sent back to the
/// client, so callers can match on the kind rather than on the message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// Blank or whitespace-only symbol.
    #[error("Please enter a stock symbol")]
    Validation,

    /// The provider answered `404` for the symbol.
    #[error("No record has been found, please enter a valid symbol.")]
    NotFound,

    /// The symbol exists but the provider returned no quote records.
    #[error("No recent trading data available for this symbol.")]
    NoData,

    /// Transport failure, a non-404 error status, or an undecodable body.
    #[error("{0}")]
    Upstream(String),

    /// Malformed quote timestamp. The detail is logged, never sent.
    #[error("failed to parse timestamp: {0}")]
    Parse(String),

    #[error("{0}")]
    Internal(String),
}

impl QuoteError {
    /// HTTP status the error surfaces as.
    pub fn status(&self) -> u16 {
        match self {
            QuoteError::Validation
            | QuoteError::NotFound
            | QuoteError::NoData
            | QuoteError::Upstream(_)
            | QuoteError::Parse(_) => 400,
            QuoteError::Internal(_) => 500,
        }
    }

    /// The message that is safe to show a client; 500-class details are never leaked.
    pub fn client_message(&self) -> String {
        match self {
            QuoteError::Parse(_) => UNREADABLE_TIMESTAMP.to_string(),
            _ if self.status() == 500 => UNEXPECTED_ERROR.to_string(),
            _ => self.to_string(),
        }
    }
}
