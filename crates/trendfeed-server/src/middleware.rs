use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

const API_KEYS_VAR: &str = "TRENDFEED_API_KEYS";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

type KeyDigest = [u8; 32];

/// Bearer API-key settings used by middleware.
///
/// Only salted SHA-256 digests of the configured keys are held in memory.
#[derive(Debug, Clone)]
pub struct AuthState {
    digests: Arc<Vec<KeyDigest>>,
    salt: Arc<str>,
    pub enabled: bool,
}

impl AuthState {
    /// Builds auth config from `TRENDFEED_API_KEYS` (comma-separated bearer
    /// tokens).
    ///
    /// In development, empty/missing keys disable auth for local iteration.
    /// In non-development envs, empty/missing keys fail startup.
    pub fn from_env(is_development: bool, salt: Option<&str>) -> anyhow::Result<Self> {
        let raw = std::env::var(API_KEYS_VAR).unwrap_or_default();
        let keys: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if keys.is_empty() {
            if is_development {
                tracing::warn!(
                    "{API_KEYS_VAR} not set; bearer auth disabled in development environment"
                );
                return Ok(Self::disabled());
            }

            anyhow::bail!(
                "{API_KEYS_VAR} is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(Self::from_keys(&keys, salt))
    }

    /// Auth enabled for exactly `keys`.
    #[must_use]
    pub fn from_keys(keys: &[&str], salt: Option<&str>) -> Self {
        let salt: Arc<str> = salt.unwrap_or_default().into();
        let digests = keys.iter().map(|key| digest(&salt, key)).collect();
        Self {
            digests: Arc::new(digests),
            salt,
            enabled: true,
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            digests: Arc::new(Vec::new()),
            salt: Arc::from(""),
            enabled: false,
        }
    }

    /// Compares against every stored digest so timing does not depend on
    /// which key (if any) matched.
    fn allows(&self, token: &str) -> bool {
        let candidate = digest(&self.salt, token);
        self.digests
            .iter()
            .fold(subtle::Choice::from(0), |acc, stored| {
                acc | stored.as_slice().ct_eq(candidate.as_slice())
            })
            .into()
    }
}

fn digest(salt: &str, token: &str) -> KeyDigest {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

fn middleware_error(status: StatusCode, code: &'static str, message: &'static str) -> Response {
    (
        status,
        Json(MiddlewareErrorBody {
            error: MiddlewareError { code, message },
        }),
    )
        .into_response()
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing Bearer token auth when enabled.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    match extract_bearer_token(req.headers().get(AUTHORIZATION)) {
        Some(token) if auth.allows(token) => next.run(req).await,
        _ => middleware_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid bearer token",
        ),
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
