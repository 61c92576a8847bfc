use crate::api::MarketData;
use crate::config::ApiConfig;
use anyhow::Context;
use async_trait::async_trait;
use log::{debug, error};
use quotedeck_common::schema::Metadata;
use quotedeck_common::{CompanyInfo, QuoteError, RawQuote, Result, Symbol};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, StatusCode, Url};
use serde::de::DeserializeOwned;

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// API Documentation: https://www.tiingo.com/documentation/general/overview
//
////////////////////////////////////////////////////////////////////////////////////////////////////

const COMPANY_INFO: &str = "company info";
const STOCK_SUMMARY: &str = "stock summary";

/// [`MarketData`] backed by the Tiingo REST API.
///
/// 1. `GET <base>/tiingo/daily/<symbol>` - company metadata.
/// 2. `GET <base>/iex/<symbol>` - array of IEX quote records, latest first.
#[derive(Debug, Clone)]
pub struct TiingoClient {
    http_client: HttpClient,
    base_url: Url,
}

impl TiingoClient {
    /// Build the underlying [`reqwest::Client`] with the auth header baked in.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Token {}", config.api_key))
            .context("API key is not a valid header value")?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);

        let mut builder = reqwest::ClientBuilder::new()
            .user_agent(&config.user_agent)
            .default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid provider base url: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("provider base url cannot carry a path: {base_url}");
        }

        Ok(TiingoClient {
            http_client: builder.build()?,
            base_url,
        })
    }

    /// `<base>/<segments..>`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| QuoteError::Internal(format!("unusable base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `url` and deserialize its JSON body; `what` names the request in error messages.
    async fn fetch_de<D>(&self, url: Url, what: &str) -> Result<D>
    where
        D: DeserializeOwned,
    {
        debug!("Requesting {what} from: {url}");
        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| upstream(what, &url, e))?;

        let status = response.status();
        debug!("{what} response status: {status}");
        if status == StatusCode::NOT_FOUND {
            return Err(QuoteError::NotFound);
        }

        let response = response
            .error_for_status()
            .map_err(|e| upstream(what, &url, e))?;
        let de: D = response.json().await.map_err(|e| upstream(what, &url, e))?;

        Ok(de)
    }
}

/// Log a provider failure and wrap it as [`QuoteError::Upstream`].
fn upstream(what: &str, url: &Url, e: reqwest::Error) -> QuoteError {
    error!("Error fetching {what} from {url}: {e}");
    QuoteError::Upstream(format!("Error fetching {what}: {e}"))
}

#[async_trait]
impl MarketData for TiingoClient {
    async fn fetch_company_info(&self, symbol: &Symbol) -> Result<CompanyInfo> {
        let url = self.endpoint(&["tiingo", "daily", symbol.as_str()])?;
        let metadata: Metadata = self.fetch_de(url, COMPANY_INFO).await?;
        Ok(metadata.into())
    }

    async fn fetch_latest_quote(&self, symbol: &Symbol) -> Result<RawQuote> {
        let url = self.endpoint(&["iex", symbol.as_str()])?;
        let records: Vec<RawQuote> = self.fetch_de(url, STOCK_SUMMARY).await?;
        RawQuote::latest(records)
    }
}
