use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A trending-search observation mapped onto the canonical column set of the
/// `trending_keywords` table. Every field except `raw` may be absent; rows
/// without a title are skipped at insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedKeyword {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Category names joined with `|`, in source order.
    pub categories: Option<String>,
    pub search_volume: Option<i32>,
    pub increase_percentage: Option<i32>,
    pub active: Option<bool>,
    pub start_time: Option<DateTime<Utc>>,
    pub trends_link: Option<String>,
    pub news_page_token: Option<String>,
    pub news_link: Option<String>,
    /// Original provider payload, kept verbatim.
    pub raw: Value,
}

impl NormalizedKeyword {
    /// Returns the title if it is present and not blank.
    #[must_use]
    pub fn insertable_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }
}
