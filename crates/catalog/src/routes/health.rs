//! Health check handlers.

use axum::{Json, extract::State, http::StatusCode};

use crate::cache::CacheHealth;
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the cache has completed one
/// successful refresh, and again once it has been stopped.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<CacheHealth>) {
    let health = state.cache().health();
    let status = if health.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}
