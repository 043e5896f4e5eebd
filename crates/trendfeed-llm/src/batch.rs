//! Batch short-form item generation from trending-keyword records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trendfeed_core::{GeneratedFeedItem, GeneratedItems};

use crate::client::{ChatClient, ChatRequest};
use crate::error::{Flow, LlmError};
use crate::json::parse_json_object;
use crate::prompts::{batch_user_prompt, BATCH_SYSTEM_PROMPT, SHORT_DESCRIPTION_MAX_CHARS};

const BATCH_TEMPERATURE: f64 = 0.3;

/// Records the fallback summarizes when generation fails.
const FALLBACK_RECORD_LIMIT: usize = 3;

/// The slice of a trending record the batch prompt needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub title: String,
    pub categories: Option<String>,
    pub search_volume: Option<i32>,
    pub increase_percentage: Option<i32>,
    pub link: Option<String>,
    pub news_link: Option<String>,
}

/// Generate short feed items for a set of keyword records.
///
/// Never fails. Any provider error, malformed output, or an output with no
/// usable items is replaced by [`fallback_items`]. An empty record slice
/// returns an empty result without calling the provider.
pub async fn generate_items_from_records(
    client: &ChatClient,
    records: &[KeywordRecord],
    max_items: usize,
) -> GeneratedItems {
    if records.is_empty() {
        return GeneratedItems::default();
    }

    let attempt = async {
        let user = batch_user_prompt(records, max_items);
        let text = client
            .complete(&ChatRequest {
                system: BATCH_SYSTEM_PROMPT,
                user: &user,
                temperature: BATCH_TEMPERATURE,
                max_tokens: None,
            })
            .await?;
        parse_batch_output(&text, max_items)
    }
    .await;

    // The batch policy falls back for every failure kind; the second arm only
    // keeps this function total if that table ever changes.
    Flow::BatchItems
        .settle(attempt, || fallback_items(records))
        .unwrap_or_else(|_| fallback_items(records))
}

/// Enforce the batch output contract on raw model text.
///
/// Items without a non-empty title are dropped, descriptions are trimmed and
/// truncated, and at most `max_items` survive.
///
/// # Errors
///
/// Returns [`LlmError::MalformedJson`] for non-JSON text, and
/// [`LlmError::ContractViolation`] when `items` is missing, not a list, or
/// yields no usable item.
pub fn parse_batch_output(text: &str, max_items: usize) -> Result<GeneratedItems, LlmError> {
    let object = parse_json_object(text)?;

    let entries = object
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| LlmError::ContractViolation("output has no `items` list".into()))?;

    let items: Vec<GeneratedFeedItem> = entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| {
            let title = entry
                .get("title")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())?;
            let description = entry
                .get("description")
                .and_then(Value::as_str)
                .map(|d| truncate_chars(d.trim(), SHORT_DESCRIPTION_MAX_CHARS))
                .unwrap_or_default();
            Some(GeneratedFeedItem::short(title, description))
        })
        .take(max_items)
        .collect();

    if items.is_empty() {
        return Err(LlmError::ContractViolation("output has no usable items".into()));
    }

    Ok(GeneratedItems { items })
}

/// Deterministic items built from the first few records alone.
#[must_use]
pub fn fallback_items(records: &[KeywordRecord]) -> GeneratedItems {
    let items = records
        .iter()
        .filter(|record| !record.title.trim().is_empty())
        .take(FALLBACK_RECORD_LIMIT)
        .map(|record| {
            let title = record.title.trim();
            let mut description = format!("{title} 관련 최근 관심 요약");
            if let Some(categories) = record
                .categories
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
            {
                description.push_str(&format!(" (분야: {categories})"));
            }
            if let Some(volume) = record.search_volume {
                description.push_str(&format!(" (검색량: {volume})"));
            }
            GeneratedFeedItem::short(title, description)
        })
        .collect();

    GeneratedItems { items }
}

/// Truncate to at most `max` Unicode scalar values.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
