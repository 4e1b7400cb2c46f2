//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use greenbox_core::DisplayProduct;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// List every product in the current cache snapshot.
pub async fn index(State(state): State<AppState>) -> Json<Vec<DisplayProduct>> {
    Json(state.cache().list().to_vec())
}

/// Show a single product by ID.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DisplayProduct>> {
    state
        .cache()
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Outcome of a manual refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Number of products in the new snapshot.
    pub refreshed: usize,
}

/// Run one refresh cycle now instead of waiting for the next tick.
///
/// On failure the previous snapshot stays in place.
pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>> {
    let refreshed = state.cache().refresh().await?;
    Ok(Json(RefreshResponse { refreshed }))
}
