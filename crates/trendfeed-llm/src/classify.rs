//! News-title classification into the closed category set.

use serde_json::{json, Value};
use trendfeed_core::{is_known_category, UNCATEGORIZED};

use crate::client::{ChatClient, ChatRequest};
use crate::error::{Flow, LlmError};
use crate::json::parse_json_object;
use crate::prompts::classifier_system_prompt;

/// Titles sent per provider call.
pub const CLASSIFY_BATCH_SIZE: usize = 5;

const CLASSIFY_TEMPERATURE: f64 = 0.0;

/// Assign one category label to each title, index-aligned with the input.
///
/// Titles are sent in batches of [`CLASSIFY_BATCH_SIZE`]. A batch that fails
/// for any reason, or whose answer has the wrong length, becomes all
/// [`UNCATEGORIZED`]; other batches are unaffected. A single label outside the
/// closed set becomes [`UNCATEGORIZED`] on its own.
pub async fn categorize_titles(client: &ChatClient, titles: &[String]) -> Vec<String> {
    if titles.is_empty() {
        return Vec::new();
    }

    let system = classifier_system_prompt();
    let mut labels = Vec::with_capacity(titles.len());

    for batch in titles.chunks(CLASSIFY_BATCH_SIZE) {
        let attempt = classify_batch(client, &system, batch).await;
        let batch_labels = Flow::Classify
            .settle(attempt, || uncategorized(batch.len()))
            .unwrap_or_else(|_| uncategorized(batch.len()));

        if batch_labels.len() == batch.len() {
            labels.extend(batch_labels);
        } else {
            labels.extend(uncategorized(batch.len()));
        }
    }

    if labels.len() != titles.len() {
        tracing::warn!(
            expected = titles.len(),
            got = labels.len(),
            "classification length mismatch, discarding all labels"
        );
        return uncategorized(titles.len());
    }

    labels
}

async fn classify_batch(
    client: &ChatClient,
    system: &str,
    batch: &[String],
) -> Result<Vec<String>, LlmError> {
    let user = json!({ "titles": batch }).to_string();
    let text = client
        .complete(&ChatRequest {
            system,
            user: &user,
            temperature: CLASSIFY_TEMPERATURE,
            max_tokens: None,
        })
        .await?;
    parse_classifier_output(&text, batch.len())
}

/// Enforce the classifier output contract on raw model text.
///
/// # Errors
///
/// Returns [`LlmError::MalformedJson`] for non-JSON text, and
/// [`LlmError::ContractViolation`] when `categories` is missing, not a list,
/// or not exactly `expected` long.
pub fn parse_classifier_output(text: &str, expected: usize) -> Result<Vec<String>, LlmError> {
    let object = parse_json_object(text)?;

    let categories = object
        .get("categories")
        .and_then(Value::as_array)
        .ok_or_else(|| LlmError::ContractViolation("output has no `categories` list".into()))?;

    if categories.len() != expected {
        return Err(LlmError::ContractViolation(format!(
            "expected {expected} categories, got {}",
            categories.len()
        )));
    }

    Ok(categories.iter().map(closed_set_label).collect())
}

fn closed_set_label(value: &Value) -> String {
    value
        .as_str()
        .map(str::trim)
        .filter(|label| is_known_category(label))
        .unwrap_or(UNCATEGORIZED)
        .to_string()
}

fn uncategorized(len: usize) -> Vec<String> {
    vec![UNCATEGORIZED.to_string(); len]
}
