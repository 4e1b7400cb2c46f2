//! Product sources feeding the catalog cache.
//!
//! # Implementations
//!
//! - [`HttpProductSource`] - `GET`s a JSON array of products from a configured
//!   upstream endpoint
//! - [`InMemoryProductSource`] - fixed or seeded pseudo-random product list,
//!   used for local development and tests
//!
//! Which one runs is a deployment decision ([`SourceConfig`]); the cache only
//! ever sees `Arc<dyn ProductSource>` handed to its constructor.
//!
//! # Example
//!
//! ```rust,ignore
//! use greenbox_catalog::source::{self, ProductSource};
//!
//! let source = source::from_config(&config.source)?;
//! let products = source.fetch_all().await?;
//! ```

mod http;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use greenbox_core::RawProduct;
use thiserror::Error;

use crate::config::SourceConfig;

pub use http::HttpProductSource;
pub use memory::InMemoryProductSource;

/// Errors that can occur while fetching products from a source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("Upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not a JSON array of product records.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Source is temporarily unable to serve products.
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// Source settings were rejected while building it.
    #[error("Invalid source configuration: {0}")]
    InvalidConfig(String),
}

/// Supplier of the current raw product list.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch every current product, in upstream order.
    async fn fetch_all(&self) -> Result<Vec<RawProduct>, SourceError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Build the product source selected by configuration.
///
/// # Errors
///
/// Returns `SourceError::InvalidConfig` if the API token is not a valid
/// header value, or `SourceError::Http` if the HTTP client fails to build.
pub fn from_config(config: &SourceConfig) -> Result<Arc<dyn ProductSource>, SourceError> {
    let source: Arc<dyn ProductSource> = match config {
        SourceConfig::Http(http) => Arc::new(HttpProductSource::new(http)?),
        SourceConfig::InMemory(fake) => Arc::new(match fake.seed {
            Some(seed) => InMemoryProductSource::seeded(fake.product_count, seed),
            None => InMemoryProductSource::random(fake.product_count),
        }),
    };
    tracing::info!(source = source.name(), "Product source configured");
    Ok(source)
}
