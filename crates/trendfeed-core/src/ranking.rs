use serde::{Deserialize, Serialize};

/// One (press, rank) entry from the "most read" news ranking page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingNewsItem {
    pub press: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub rank: i32,
    pub title: String,
    pub link: String,
}
