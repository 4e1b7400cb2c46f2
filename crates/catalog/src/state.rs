//! Application state shared across handlers.

use std::sync::Arc;

use crate::cache::ProductCache;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cache: ProductCache,
}

impl AppState {
    /// Create a new application state around an already started cache.
    #[must_use]
    pub fn new(cache: ProductCache) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cache }),
        }
    }

    /// Get a reference to the product cache.
    #[must_use]
    pub fn cache(&self) -> &ProductCache {
        &self.inner.cache
    }
}
