use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One item produced by a generation flow, ready for feed serialization.
///
/// `title` is always non-empty; generation flows drop candidates that fail
/// that check before constructing this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFeedItem {
    pub title: String,
    /// Short-form body (batch flow), capped at 280 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Long-form abstract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Long-form body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl GeneratedFeedItem {
    /// Short-form item with a title and description only.
    #[must_use]
    pub fn short(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
            summary: None,
            content: None,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedItems {
    pub items: Vec<GeneratedFeedItem>,
}

/// Turn a loosely-shaped `tags` value into an ordered token list.
///
/// A JSON array keeps each string entry (trimmed, empties dropped). A string is
/// split on commas and newlines. Anything else yields no tags.
#[must_use]
pub fn normalize_tags(value: &Value) -> Vec<String> {
    match value {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| match entry {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split([',', '\n'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}
