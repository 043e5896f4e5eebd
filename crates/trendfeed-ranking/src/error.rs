use thiserror::Error;

/// Errors fetching the ranking page.
#[derive(Debug, Error)]
pub enum RankingError {
    /// Network failure, timeout, or non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid ranking page URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Errors from one full collection cycle.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Fetch(#[from] RankingError),

    #[error(transparent)]
    Db(#[from] trendfeed_db::DbError),
}
