use anyhow::{Context, Result};
use dotenv::var;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.tiingo.com";
pub const DEFAULT_USER_AGENT: &str = concat!("quotedeck/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the market-data provider.
///
/// Built once at startup and handed to [`TiingoClient::new`]; nothing here is global.
///
/// [`TiingoClient::new`]: crate::TiingoClient::new
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub user_agent: String,
    /// `None` leaves reqwest's default (no timeout).
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        ApiConfig {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Read the configuration from the environment (and `.env`, when present).
    ///
    /// | variable              | required | default                  |
    /// |-----------------------|----------|--------------------------|
    /// | `TIINGO_API_KEY`      | yes      |                          |
    /// | `TIINGO_BASE_URL`     | no       | `https://api.tiingo.com` |
    /// | `USER_AGENT`          | no       | `quotedeck/<version>`    |
    /// | `TIINGO_TIMEOUT_SECS` | no       | none                     |
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let api_key = var("TIINGO_API_KEY").context("TIINGO_API_KEY must be set")?;
        let mut config = ApiConfig::new(api_key);

        if let Ok(base_url) = var("TIINGO_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Ok(user_agent) = var("USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Ok(secs) = var("TIINGO_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("TIINGO_TIMEOUT_SECS is not a number: {secs}"))?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}
