//! HTTP route handlers for the catalog.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (cache has loaded products)
//!
//! # Products (JSON)
//! GET  /api/products           - Current product list
//! GET  /api/products/{id}      - Single product
//! POST /api/refresh            - Refresh the cache now, returns the new count
//! ```

pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the catalog router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/api/products", get(products::index))
        .route("/api/products/{id}", get(products::show))
        .route("/api/refresh", post(products::refresh))
        .layer(TraceLayer::new_for_http())
}
