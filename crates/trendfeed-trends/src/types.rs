use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters for one `google_trends_trending_now` request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrendingNowParams {
    pub geo: String,
    pub hl: String,
    /// Look-back window in hours, 1..=24.
    pub hours: i32,
    pub category_id: Option<i64>,
    pub no_cache: bool,
}

impl Default for TrendingNowParams {
    fn default() -> Self {
        Self {
            geo: "KR".to_string(),
            hl: "ko".to_string(),
            hours: 4,
            category_id: None,
            no_cache: false,
        }
    }
}

impl TrendingNowParams {
    /// Clamp `hours` into the range the provider accepts.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.hours = self.hours.clamp(1, 24);
        self
    }
}

/// Request echo plus result count, returned alongside the raw items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendingNowMeta {
    pub geo: String,
    pub hl: String,
    pub category_id: Option<i64>,
    pub hours: i32,
    pub count: usize,
    /// Provider-reported or transport error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrendingNowMeta {
    #[must_use]
    pub fn for_params(params: &TrendingNowParams) -> Self {
        Self {
            geo: params.geo.clone(),
            hl: params.hl.clone(),
            category_id: params.category_id,
            hours: params.hours,
            count: 0,
            error: None,
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Raw `trending_searches` entries from one provider call.
///
/// Items are kept as untyped JSON; [`crate::normalize_trending_item`] maps
/// them onto the canonical schema.
#[derive(Debug, Clone, Serialize)]
pub struct TrendingNowResponse {
    pub items: Vec<Value>,
    pub meta: TrendingNowMeta,
}
