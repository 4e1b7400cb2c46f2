//! Periodically refreshed in-memory product cache.
//!
//! The cache owns a single immutable snapshot of display products. One
//! background task replaces that snapshot wholesale on a fixed interval;
//! readers clone the `Arc` to the current snapshot and never see a partially
//! built list.
//!
//! # Lifecycle
//!
//! ```text
//! Initializing --start--> Ready --tick--> Refreshing --done--> Ready
//!                           |                 |
//!                           +------stop-------+--> Stopped
//! ```
//!
//! A failed refresh keeps the previous snapshot, logs the failure and waits
//! for the next tick. There is no backoff.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use greenbox_core::{DisplayProduct, transform};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::source::{ProductSource, SourceError};

/// Default period between refreshes.
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

/// Longest accepted period between refreshes (one year).
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Errors returned by an explicit refresh.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The product source failed; the previous snapshot was kept.
    #[error("Refresh failed: {0}")]
    Source(#[from] SourceError),

    /// The cache has been stopped and no longer fetches.
    #[error("Product cache is stopped")]
    Stopped,
}

/// Cache scheduling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Fixed period between refreshes. The first tick fires one period after start.
    pub refresh_interval: Duration,
}

impl CacheSettings {
    #[must_use]
    pub const fn new(refresh_interval: Duration) -> Self {
        Self { refresh_interval }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}

/// Lifecycle state of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Initializing,
    Ready,
    Refreshing,
    Stopped,
}

/// Point-in-time summary used by the readiness endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheHealth {
    pub status: CacheStatus,
    /// Number of products in the current snapshot.
    pub products: usize,
    /// When the current snapshot was fetched; `None` until the first success.
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Failed refreshes since the last successful one.
    pub consecutive_failures: u32,
}

impl CacheHealth {
    /// Whether the cache is serving data from at least one successful fetch.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.refreshed_at.is_some()
            && matches!(self.status, CacheStatus::Ready | CacheStatus::Refreshing)
    }
}

/// The periodic product cache.
///
/// Cheaply cloneable; all clones share one snapshot and one refresh task.
#[derive(Clone)]
pub struct ProductCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    source: Arc<dyn ProductSource>,
    snapshot: RwLock<Snapshot>,
    status: RwLock<CacheStatus>,
    consecutive_failures: AtomicU32,
    /// Serializes refresh cycles so there is a single writer at a time.
    refresh_lock: tokio::sync::Mutex<()>,
    task: Mutex<Option<RefreshTask>>,
}

#[derive(Clone)]
struct Snapshot {
    products: Arc<[DisplayProduct]>,
    refreshed_at: Option<DateTime<Utc>>,
}

struct RefreshTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl ProductCache {
    /// Load the initial product list and start the refresh timer.
    ///
    /// An initial fetch failure does not abort startup: the cache serves an
    /// empty list and the next tick retries. Intervals longer than
    /// [`MAX_REFRESH_INTERVAL`] are clamped to it.
    pub async fn start(source: Arc<dyn ProductSource>, settings: CacheSettings) -> Self {
        let cache = Self::new(source);

        if let Err(error) = cache.refresh().await {
            info!(%error, "Starting with an empty product list");
        }

        let period = if settings.refresh_interval > MAX_REFRESH_INTERVAL {
            warn!(
                requested_secs = settings.refresh_interval.as_secs(),
                max_secs = MAX_REFRESH_INTERVAL.as_secs(),
                "Refresh interval too long, clamping"
            );
            MAX_REFRESH_INTERVAL
        } else {
            settings.refresh_interval
        };

        cache.spawn_refresh_task(period);
        info!(interval_secs = period.as_secs(), "Product cache started");
        cache
    }

    /// Create an idle cache with an empty snapshot and no timer.
    fn new(source: Arc<dyn ProductSource>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                source,
                snapshot: RwLock::new(Snapshot {
                    products: Arc::from(Vec::new()),
                    refreshed_at: None,
                }),
                status: RwLock::new(CacheStatus::Initializing),
                consecutive_failures: AtomicU32::new(0),
                refresh_lock: tokio::sync::Mutex::new(()),
                task: Mutex::new(None),
            }),
        }
    }

    /// The current product list.
    ///
    /// Never waits for an in-flight refresh. The returned snapshot is
    /// immutable and unaffected by later refreshes.
    #[must_use]
    pub fn list(&self) -> Arc<[DisplayProduct]> {
        self.inner.snapshot().products
    }

    /// Look up one product in the current snapshot.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<DisplayProduct> {
        self.list().iter().find(|p| p.id.as_str() == id).cloned()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> CacheStatus {
        self.inner.status()
    }

    /// Summary of the cache for health checks.
    #[must_use]
    pub fn health(&self) -> CacheHealth {
        let snapshot = self.inner.snapshot();
        CacheHealth {
            status: self.inner.status(),
            products: snapshot.products.len(),
            refreshed_at: snapshot.refreshed_at,
            consecutive_failures: self.inner.consecutive_failures.load(Ordering::Relaxed),
        }
    }

    /// Run one fetch-transform-replace cycle now.
    ///
    /// Returns the number of products installed.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Source` if the fetch failed (the previous snapshot
    /// is kept) or `CacheError::Stopped` after [`ProductCache::stop`].
    pub async fn refresh(&self) -> Result<usize, CacheError> {
        self.inner.refresh().await
    }

    /// Stop the refresh timer.
    ///
    /// A refresh already in progress completes first. The last committed
    /// snapshot stays readable. Calling `stop` again has no effect.
    pub async fn stop(&self) {
        let task = self
            .inner
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(task) = task {
            // Receiver is gone only if the task already exited
            let _ = task.shutdown.send(());
            if let Err(error) = task.handle.await {
                warn!(%error, "Product refresh task ended abnormally");
            }
        }

        let _guard = self.inner.refresh_lock.lock().await;
        if self.inner.status() != CacheStatus::Stopped {
            self.inner.set_status(CacheStatus::Stopped);
            info!("Product cache stopped");
        }
    }

    fn spawn_refresh_task(&self, period: Duration) {
        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();
        let weak = Arc::downgrade(&self.inner);

        let now = Instant::now();
        let first_tick = now
            .checked_add(period)
            .or_else(|| now.checked_add(MAX_REFRESH_INTERVAL))
            .unwrap_or(now);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {}
                }

                let Some(inner) = weak.upgrade() else {
                    break;
                };
                // Failures are logged by refresh; the next tick retries
                let _ = inner.refresh().await;
            }

            debug!("Product refresh task exited");
        });

        *self.inner.task.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(RefreshTask { shutdown, handle });
    }
}

impl CacheInner {
    fn snapshot(&self) -> Snapshot {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn status(&self) -> CacheStatus {
        *self.status.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, status: CacheStatus) {
        *self.status.write().unwrap_or_else(PoisonError::into_inner) = status;
    }

    #[instrument(skip_all, fields(source = self.source.name()))]
    async fn refresh(&self) -> Result<usize, CacheError> {
        let _guard = self.refresh_lock.lock().await;

        match self.status() {
            CacheStatus::Stopped => return Err(CacheError::Stopped),
            CacheStatus::Ready => self.set_status(CacheStatus::Refreshing),
            CacheStatus::Initializing | CacheStatus::Refreshing => {}
        }

        let result = self.source.fetch_all().await;
        let outcome = match result {
            Ok(raw) => {
                let products: Arc<[DisplayProduct]> = raw.iter().map(transform).collect();
                let count = products.len();

                *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Snapshot {
                    products,
                    refreshed_at: Some(Utc::now()),
                };
                self.consecutive_failures.store(0, Ordering::Relaxed);

                info!(count, "Product cache refreshed");
                Ok(count)
            }
            Err(error) => {
                let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(
                    %error,
                    consecutive_failures = failures,
                    "Product refresh failed, keeping previous products"
                );
                Err(CacheError::Source(error))
            }
        };

        self.set_status(CacheStatus::Ready);
        outcome
    }
}
