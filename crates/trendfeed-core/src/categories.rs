//! News category labels and category-filter validation.

use thiserror::Error;

/// Closed set of labels the title classifier may return.
pub const NEWS_CATEGORIES: [&str; 13] = [
    "육아", "교육", "경제", "스포츠", "연예", "사회", "생활", "세계", "문화", "IT", "과학", "정치",
    "오피니언",
];

/// Placeholder label for titles the classifier could not place.
pub const UNCATEGORIZED: &str = "기타";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryFilterError {
    #[error("category filter must be a single token, got '{0}'")]
    MultipleTokens(String),

    #[error("category filter contains control characters")]
    ControlCharacters,
}

#[must_use]
pub fn is_known_category(label: &str) -> bool {
    NEWS_CATEGORIES.contains(&label)
}

/// Validate a single-token category filter coming from a request.
///
/// Blank input means "no filter". Stored category sets are pipe-joined, so a
/// filter containing `|` can never name exactly one token and is rejected.
///
/// # Errors
///
/// Returns [`CategoryFilterError`] when the value is not a single clean token.
pub fn validate_category_filter(
    raw: Option<&str>,
) -> Result<Option<String>, CategoryFilterError> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if value.contains('|') {
        return Err(CategoryFilterError::MultipleTokens(value.to_string()));
    }
    if value.chars().any(char::is_control) {
        return Err(CategoryFilterError::ControlCharacters);
    }

    Ok(Some(value.to_string()))
}
