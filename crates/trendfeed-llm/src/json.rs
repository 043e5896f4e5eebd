//! Helpers for reading JSON out of model output.

use serde_json::{Map, Value};

use crate::error::LlmError;

/// Remove a surrounding Markdown code fence, with or without a language tag.
///
/// Text without a leading fence is returned trimmed.
#[must_use]
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parse model output as a single JSON object.
///
/// # Errors
///
/// Returns [`LlmError::MalformedJson`] if the text is not JSON, or
/// [`LlmError::ContractViolation`] if it is JSON but not an object.
pub fn parse_json_object(raw: &str) -> Result<Map<String, Value>, LlmError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| LlmError::MalformedJson(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(LlmError::ContractViolation(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// A trimmed, non-empty string field.
pub(crate) fn non_empty_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
