pub mod error;
pub mod format;
pub mod schema;
pub mod timestamp;

pub use crate::error::{QuoteError, Result};
pub use crate::schema::{CompanyInfo, ErrorBody, FormattedQuote, RawQuote, StockPayload, Symbol};
