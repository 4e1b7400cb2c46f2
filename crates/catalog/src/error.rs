//! Unified error handling for route handlers.
//!
//! Provides a unified `AppError` type mapped to sanitized client responses.
//! Refresh failures are already reported by the cache (its `warn!` becomes a
//! Sentry event), so they are only logged at debug here. All route handlers
//! should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cache::CacheError;

/// Application-level error type for the catalog API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cache operation failed.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Cache(CacheError::Source(_)) => StatusCode::BAD_GATEWAY,
            Self::Cache(CacheError::Stopped) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Cache(_)) {
            tracing::debug!(error = %self, "Request error");
        }

        // Don't expose upstream error details to clients
        let message = match &self {
            Self::Cache(CacheError::Source(_)) => "External service error".to_string(),
            Self::Cache(CacheError::Stopped) => "Catalog is shutting down".to_string(),
            Self::NotFound(_) => self.to_string(),
        };

        (self.status(), message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
