use thiserror::Error;

/// Errors returned by the `SerpApi` trending-now client.
#[derive(Debug, Error)]
pub enum TrendsError {
    /// No `SERPAPI_API_KEY` was configured for this process.
    #[error("SERPAPI_API_KEY is empty")]
    MissingApiKey,

    /// Network, TLS, timeout, or non-2xx status from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Errors from one fetch-and-store cycle.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Fetch(#[from] TrendsError),

    #[error(transparent)]
    Db(#[from] trendfeed_db::DbError),
}
