//! Greenbox Catalog library.
//!
//! Keeps an in-memory, periodically refreshed list of display-ready products
//! and serves it over a small JSON API.
//!
//! # Modules
//!
//! - [`source`] - Where raw products come from (HTTP upstream or in-memory)
//! - [`cache`] - The refreshing product cache
//! - [`routes`] - Axum handlers over the cache
//! - [`config`] - Environment-driven configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod error;
pub mod routes;
pub mod source;
pub mod state;

pub use cache::{CacheHealth, CacheSettings, CacheStatus, ProductCache};
pub use config::CatalogConfig;
pub use source::{HttpProductSource, InMemoryProductSource, ProductSource, SourceError};
pub use state::AppState;
