//! Single-keyword long-form article generation.

use trendfeed_core::{normalize_tags, GeneratedFeedItem};

use crate::client::{ChatClient, ChatRequest};
use crate::error::{Flow, LlmError};
use crate::json::{non_empty_str, parse_json_object};
use crate::prompts::{longform_user_prompt, LONGFORM_SYSTEM_PROMPT};

const LONGFORM_TEMPERATURE: f64 = 0.2;
const LONGFORM_MAX_TOKENS: u32 = 4096;

/// Who the article is written for and how long it should be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudienceProfile {
    pub ages: u32,
    pub region: String,
    pub gender: String,
    pub tone: String,
    /// Target body length in characters, spaces included.
    pub target_len: u32,
}

impl Default for AudienceProfile {
    fn default() -> Self {
        Self {
            ages: 30,
            region: "대한민국".to_string(),
            gender: "남성".to_string(),
            tone: "진중한".to_string(),
            target_len: 8000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthPolicy {
    /// Absolute lower bound on the requested minimum length.
    pub min_floor: u32,
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self { min_floor: 3000 }
    }
}

impl LengthPolicy {
    /// `max(min_floor, floor(target_len * 0.8))`.
    #[must_use]
    pub fn min_len(&self, target_len: u32) -> u32 {
        let eighty_percent = u32::try_from(u64::from(target_len) * 4 / 5).unwrap_or(u32::MAX);
        self.min_floor.max(eighty_percent)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LongFormRequest {
    pub keyword: String,
    pub audience: AudienceProfile,
    pub length: LengthPolicy,
}

/// Generate one long-form article for a seed keyword.
///
/// A blank keyword yields an empty list without calling the provider. On
/// success the list holds exactly one item.
///
/// # Errors
///
/// Every failure propagates: provider errors, unparseable output, output that
/// is not a JSON object, and an object without a non-empty `title`.
pub async fn generate_longform(
    client: &ChatClient,
    request: &LongFormRequest,
) -> Result<Vec<GeneratedFeedItem>, LlmError> {
    let keyword = request.keyword.trim();
    if keyword.is_empty() {
        return Ok(Vec::new());
    }

    let attempt = async {
        let user = longform_user_prompt(keyword, &request.audience, &request.length);
        let text = client
            .complete(&ChatRequest {
                system: LONGFORM_SYSTEM_PROMPT,
                user: &user,
                temperature: LONGFORM_TEMPERATURE,
                max_tokens: Some(LONGFORM_MAX_TOKENS),
            })
            .await?;
        parse_longform_output(&text).map(|item| vec![item])
    }
    .await;

    let items = Flow::LongForm.settle(attempt, Vec::new)?;
    tracing::info!(keyword, items = items.len(), "generated long-form article");
    Ok(items)
}

/// Enforce the long-form output contract on raw model text.
///
/// # Errors
///
/// Returns [`LlmError::MalformedJson`] or [`LlmError::ContractViolation`].
pub fn parse_longform_output(text: &str) -> Result<GeneratedFeedItem, LlmError> {
    let object = parse_json_object(text)?;

    let title = non_empty_str(&object, "title")
        .ok_or_else(|| LlmError::ContractViolation("long-form output has no title".into()))?;

    Ok(GeneratedFeedItem {
        title: title.to_string(),
        description: None,
        summary: non_empty_str(&object, "summary").map(ToOwned::to_owned),
        content: non_empty_str(&object, "content").map(ToOwned::to_owned),
        tags: object.get("tags").map_or_else(Vec::new, normalize_tags),
    })
}
