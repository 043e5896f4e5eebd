//! HTTP client for the `SerpApi` Google Trends "trending now" engine.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::TrendsError;
use crate::types::{TrendingNowMeta, TrendingNowParams, TrendingNowResponse};

const DEFAULT_BASE_URL: &str = "https://serpapi.com/search";
const ENGINE: &str = "google_trends_trending_now";

/// Client for the `SerpApi` search endpoint.
///
/// Built once per process. A client without an API key can still be
/// constructed; every fetch then fails with [`TrendsError::MissingApiKey`].
#[derive(Debug, Clone)]
pub struct SerpApiClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
}

impl SerpApiClient {
    /// Creates a client pointed at the production `SerpApi` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TrendsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<&str>,
        connect_timeout_secs: u64,
        timeout_secs: u64,
    ) -> Result<Self, TrendsError> {
        Self::with_base_url(api_key, connect_timeout_secs, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom endpoint URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TrendsError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`TrendsError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        connect_timeout_secs: u64,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, TrendsError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("trendfeed/0.1 (trend-collection)")
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| TrendsError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToOwned::to_owned),
            base_url,
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch the current trending searches for a region.
    ///
    /// Returns the raw `trending_searches` array (empty when the field is
    /// missing or not a list). An `error` string in an otherwise successful
    /// response body is surfaced through `meta.error`, not as `Err`.
    ///
    /// # Errors
    ///
    /// - [`TrendsError::MissingApiKey`] if no key is configured.
    /// - [`TrendsError::Http`] on network failure, timeout, or non-2xx status.
    /// - [`TrendsError::Deserialize`] if the body is not JSON.
    pub async fn fetch_trending_now(
        &self,
        params: &TrendingNowParams,
    ) -> Result<TrendingNowResponse, TrendsError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(TrendsError::MissingApiKey);
        };

        let url = self.build_url(api_key, params);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body).map_err(|e| TrendsError::Deserialize {
            context: format!("{ENGINE}(geo={})", params.geo),
            source: e,
        })?;

        let items = pick_trending_array(&data);
        let mut meta = TrendingNowMeta::for_params(params);
        meta.count = items.len();
        meta.error = data
            .get("error")
            .map(|e| e.as_str().map_or_else(|| e.to_string(), ToOwned::to_owned));

        tracing::debug!(
            geo = %params.geo,
            hours = params.hours,
            count = meta.count,
            "fetched trending searches"
        );

        Ok(TrendingNowResponse { items, meta })
    }

    fn build_url(&self, api_key: &str, params: &TrendingNowParams) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("engine", ENGINE);
            pairs.append_pair("api_key", api_key);
            pairs.append_pair("geo", &params.geo);
            pairs.append_pair("hl", &params.hl);
            pairs.append_pair("hours", &params.hours.to_string());
            if let Some(category_id) = params.category_id {
                pairs.append_pair("category_id", &category_id.to_string());
            }
            if params.no_cache {
                pairs.append_pair("no_cache", "true");
            }
        }
        url
    }
}

fn pick_trending_array(data: &Value) -> Vec<Value> {
    data.get("trending_searches")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
