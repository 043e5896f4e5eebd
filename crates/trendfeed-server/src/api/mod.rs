mod ranking;
mod rss;
mod trends;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use trendfeed_core::AppConfig;
use trendfeed_llm::{ChatClient, ChatConfig, FailureKind, LengthPolicy, LlmError};
use trendfeed_ranking::RankingClient;
use trendfeed_rss::{ChannelMeta, FeedError};
use trendfeed_trends::SerpApiClient;

use crate::middleware::{request_id, require_bearer_auth, AuthState, RequestId};

/// Generation knobs taken from configuration at startup.
#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub feed_max_items: usize,
    pub longform_target_len: u32,
    pub length: LengthPolicy,
}

impl GenerationSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            feed_max_items: config.feed_max_items,
            longform_target_len: config.longform_target_len,
            length: LengthPolicy {
                min_floor: config.longform_min_floor,
            },
        }
    }
}

/// Shared handles. Every outbound client is built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub chat: Arc<ChatClient>,
    pub serpapi: Arc<SerpApiClient>,
    pub ranking: Arc<RankingClient>,
    pub channel: Arc<ChannelMeta>,
    pub generation: GenerationSettings,
}

impl AppState {
    /// Builds every provider client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any HTTP client cannot be constructed or a
    /// configured base URL does not parse.
    pub fn from_config(pool: PgPool, config: &AppConfig) -> anyhow::Result<Self> {
        let chat = ChatClient::new(&ChatConfig::from_app_config(config))?;
        if !chat.is_configured() {
            tracing::warn!("OPENAI_API_KEY not set; generation will use fallbacks or report not_configured");
        }

        let serpapi = SerpApiClient::new(
            config.serpapi_api_key.as_deref(),
            config.http_connect_timeout_secs,
            config.http_timeout_secs,
        )?;
        let ranking = RankingClient::new(
            &config.scraper_user_agent,
            config.http_connect_timeout_secs,
            config.http_timeout_secs,
        )?;

        Ok(Self {
            pool,
            chat: Arc::new(chat),
            serpapi: Arc::new(serpapi),
            ranking: Arc::new(ranking),
            channel: Arc::new(ChannelMeta::from_app_config(config)),
            generation: GenerationSettings::from_app_config(config),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "forbidden" => StatusCode::FORBIDDEN,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            "not_configured" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &trendfeed_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn map_llm_error(request_id: String, error: &LlmError) -> ApiError {
    tracing::error!(error = %error, kind = %error.kind(), "generation failed");
    match error.kind() {
        FailureKind::NotConfigured => ApiError::new(
            request_id,
            "not_configured",
            "text generation provider is not configured",
        ),
        _ => ApiError::new(request_id, "upstream_error", error.to_string()),
    }
}

pub(super) fn map_feed_error(request_id: String, error: &FeedError) -> ApiError {
    tracing::error!(error = %error, "feed serialization failed");
    ApiError::new(request_id, "internal_error", "feed serialization failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/rss/trends", post(rss::feed_from_trends))
        .route("/api/v1/rss/generate", post(rss::generate_longform_feed))
        .route(
            "/api/v1/rss/naver/ranking/collect",
            post(ranking::collect_ranking_news),
        )
        .route("/api/v1/trends/realtime", get(trends::realtime_trends))
        .route(
            "/api/v1/trends/realtime/store",
            post(trends::store_realtime_trends),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth,
            require_bearer_auth,
        ))
}

pub fn build_app(state: AppState, auth: AuthState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match trendfeed_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
