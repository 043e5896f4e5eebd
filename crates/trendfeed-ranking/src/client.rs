//! HTTP client for the ranking page.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::RankingError;

pub const NAVER_RANKING_URL: &str = "https://news.naver.com/main/ranking/popularDay.naver";

/// Fetches the ranking page HTML. Built once per process.
#[derive(Debug, Clone)]
pub struct RankingClient {
    client: Client,
    page_url: Url,
}

impl RankingClient {
    /// Creates a client for the production ranking page.
    ///
    /// # Errors
    ///
    /// Returns [`RankingError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        user_agent: &str,
        connect_timeout_secs: u64,
        timeout_secs: u64,
    ) -> Result<Self, RankingError> {
        Self::with_url(user_agent, connect_timeout_secs, timeout_secs, NAVER_RANKING_URL)
    }

    /// Creates a client for an arbitrary page URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`RankingError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`RankingError::InvalidUrl`] if `page_url` does not parse.
    pub fn with_url(
        user_agent: &str,
        connect_timeout_secs: u64,
        timeout_secs: u64,
        page_url: &str,
    ) -> Result<Self, RankingError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        let page_url = Url::parse(page_url).map_err(|e| RankingError::InvalidUrl {
            url: page_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, page_url })
    }

    /// The page URL; relative article links resolve against it.
    #[must_use]
    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    /// GET the ranking page and return its body.
    ///
    /// # Errors
    ///
    /// Returns [`RankingError::Http`] on network failure, timeout, or a
    /// non-2xx status.
    pub async fn fetch_html(&self) -> Result<String, RankingError> {
        let response = self
            .client
            .get(self.page_url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}
