use axum::{extract::State, Extension, Json};
use serde::Serialize;
use trendfeed_core::RankingNewsItem;
use trendfeed_ranking::{collect_ranking, CollectError};

use super::{map_db_error, ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct RankingCollectResponse {
    pub count: usize,
    pub items: Vec<RankingNewsItem>,
}

/// Run one ranking collection cycle and echo every parsed entry.
pub(super) async fn collect_ranking_news(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<RankingCollectResponse>, ApiError> {
    match collect_ranking(&state.ranking, &state.pool, Some(&state.chat)).await {
        Ok(items) => Ok(Json(RankingCollectResponse {
            count: items.len(),
            items,
        })),
        Err(CollectError::Fetch(e)) => {
            tracing::error!(error = %e, "ranking page fetch failed");
            Err(ApiError::new(
                req_id.0,
                "upstream_error",
                format!("ranking page fetch failed: {e}"),
            ))
        }
        Err(CollectError::Db(e)) => Err(map_db_error(req_id.0, &e)),
    }
}
