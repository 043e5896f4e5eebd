pub mod app_config;
pub mod categories;
pub mod config;
pub mod feed_item;
pub mod keywords;
pub mod ranking;

pub use app_config::{AppConfig, Environment};
pub use categories::{
    is_known_category, validate_category_filter, CategoryFilterError, NEWS_CATEGORIES,
    UNCATEGORIZED,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use feed_item::{normalize_tags, GeneratedFeedItem, GeneratedItems};
pub use keywords::NormalizedKeyword;
pub use ranking::RankingNewsItem;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
