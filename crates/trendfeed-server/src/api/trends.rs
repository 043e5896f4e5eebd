use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Serialize;
use trendfeed_trends::{
    collect_trending_now, CollectError, TrendingNowMeta, TrendingNowParams, TrendingNowResponse,
};

use super::{map_db_error, ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct StoreResponse {
    pub ok: bool,
    pub stored: u64,
    pub meta: TrendingNowMeta,
}

/// Provider passthrough. Upstream failures are reported in `meta.error`
/// with an empty item list rather than as an error status.
pub(super) async fn realtime_trends(
    State(state): State<AppState>,
    Query(params): Query<TrendingNowParams>,
) -> Json<TrendingNowResponse> {
    let params = params.clamped();
    match state.serpapi.fetch_trending_now(&params).await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::warn!(error = %e, geo = %params.geo, "trends/realtime: provider call failed");
            Json(TrendingNowResponse {
                items: Vec::new(),
                meta: TrendingNowMeta::for_params(&params).with_error(e.to_string()),
            })
        }
    }
}

/// Fetch, normalize, and persist one cycle.
pub(super) async fn store_realtime_trends(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<TrendingNowParams>,
) -> Result<Json<StoreResponse>, ApiError> {
    let params = params.clamped();
    match collect_trending_now(&state.serpapi, &state.pool, params.clone()).await {
        Ok(outcome) => Ok(Json(StoreResponse {
            ok: true,
            stored: outcome.stored,
            meta: outcome.meta,
        })),
        Err(CollectError::Fetch(e)) => {
            tracing::warn!(error = %e, geo = %params.geo, "trends/realtime/store: provider call failed");
            Ok(Json(StoreResponse {
                ok: false,
                stored: 0,
                meta: TrendingNowMeta::for_params(&params).with_error(e.to_string()),
            }))
        }
        Err(CollectError::Db(e)) => Err(map_db_error(req_id.0, &e)),
    }
}
