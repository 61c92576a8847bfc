pub mod api;
pub mod config;
pub mod tiingo;

pub use crate::api::MarketData;
pub use crate::config::ApiConfig;
pub use crate::tiingo::TiingoClient;
