//! Normalization from raw `trending_searches` entries to
//! [`trendfeed_core::NormalizedKeyword`].
//!
//! Provider payloads are loosely shaped: field names vary between engine
//! versions and numeric fields arrive as integers, floats, or strings. Every
//! coercion here is total. A field that cannot be read becomes `None`; a
//! whole record is never rejected.

use chrono::{DateTime, Utc};
use serde_json::Value;
use trendfeed_core::NormalizedKeyword;

const TITLE_KEYS: [&str; 3] = ["query", "title", "name"];
const LINK_KEYS: [&str; 2] = ["link", "explore_link"];

/// Maps one raw trending-search record onto the canonical column set.
#[must_use]
pub fn normalize_trending_item(raw: &Value) -> NormalizedKeyword {
    NormalizedKeyword {
        title: first_non_empty_str(raw, &TITLE_KEYS),
        link: first_non_empty_str(raw, &LINK_KEYS),
        categories: raw.get("categories").and_then(join_category_names),
        search_volume: raw.get("search_volume").and_then(coerce_i32),
        increase_percentage: raw.get("increase_percentage").and_then(coerce_i32),
        active: raw.get("active").and_then(Value::as_bool),
        start_time: raw.get("start_timestamp").and_then(epoch_to_utc),
        trends_link: non_empty_str(raw.get("serpapi_google_trends_link")),
        news_page_token: non_empty_str(raw.get("news_page_token")),
        news_link: non_empty_str(raw.get("serpapi_news_link")),
        raw: raw.clone(),
    }
}

/// Normalizes a whole provider batch, preserving order.
#[must_use]
pub fn normalize_trending_items(raw: &[Value]) -> Vec<NormalizedKeyword> {
    raw.iter().map(normalize_trending_item).collect()
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

fn first_non_empty_str(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| non_empty_str(raw.get(key)))
}

/// `[{"name": "Sports"}, {"name": "Games"}]` becomes `Sports|Games`.
fn join_category_names(value: &Value) -> Option<String> {
    let names: Vec<&str> = value
        .as_array()?
        .iter()
        .filter_map(|entry| entry.get("name").and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names.join("|"))
    }
}

/// Integers, integral floats and trimmed integer strings that fit in `i32`.
/// Bools, fractional values and anything out of range yield `None`.
fn coerce_i32(value: &Value) -> Option<i32> {
    if let Value::String(s) = value {
        return s.trim().parse::<i32>().ok();
    }
    if let Some(n) = value.as_i64() {
        return i32::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f.fract() != 0.0 || f < f64::from(i32::MIN) || f > f64::from(i32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(f as i32)
}

/// Epoch seconds as an integer, float, or numeric string.
fn epoch_to_utc(value: &Value) -> Option<DateTime<Utc>> {
    let secs = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(float_secs)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_secs))
        }
        _ => None,
    }?;
    DateTime::from_timestamp(secs, 0)
}

// Anything beyond this is rejected by `DateTime::from_timestamp` anyway; the
// bound keeps the cast below lossless in the range that matters.
const MAX_EPOCH_SECS: f64 = 1.0e15;

fn float_secs(f: f64) -> Option<i64> {
    if !f.is_finite() || f.abs() > MAX_EPOCH_SECS {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(f.trunc() as i64)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
