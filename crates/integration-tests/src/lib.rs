//! Integration tests for Greenbox.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p greenbox-integration-tests
//! ```
//!
//! Tests need no external services: [`Upstream`] starts a throwaway products
//! endpoint on an ephemeral local port whose responses can be changed while a
//! test runs.
//!
//! # Test Categories
//!
//! - `http_source` - `HttpProductSource` against a live endpoint
//! - `cache_upstream` - `ProductCache` refreshing from a live endpoint
//! - `catalog_api` - The catalog router end to end

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use url::Url;

/// A local products endpoint serving `GET /products`.
pub struct Upstream {
    addr: SocketAddr,
    state: Arc<UpstreamState>,
}

struct UpstreamState {
    body: Mutex<String>,
    status: Mutex<StatusCode>,
    delay: Mutex<Duration>,
    last_authorization: Mutex<Option<String>>,
    hits: AtomicUsize,
}

impl Upstream {
    /// Start serving `body` with `200 OK`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(body: impl Into<String>) -> Self {
        let state = Arc::new(UpstreamState {
            body: Mutex::new(body.into()),
            status: Mutex::new(StatusCode::OK),
            delay: Mutex::new(Duration::ZERO),
            last_authorization: Mutex::new(None),
            hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/products", get(products))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind upstream listener");
        let addr = listener.local_addr().expect("Failed to read upstream address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// URL of the products endpoint.
    ///
    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/products", self.addr)).expect("valid upstream URL")
    }

    /// Replace the response body (need not be valid JSON).
    pub fn set_body(&self, body: impl Into<String>) {
        *lock(&self.state.body) = body.into();
    }

    /// Replace the response status.
    pub fn set_status(&self, status: StatusCode) {
        *lock(&self.state.status) = status;
    }

    /// Delay every response by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.state.delay) = delay;
    }

    /// `Authorization` header of the most recent request.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        lock(&self.state.last_authorization).clone()
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }
}

async fn products(State(state): State<Arc<UpstreamState>>, headers: HeaderMap) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *lock(&state.last_authorization) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let delay = *lock(&state.delay);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let status = *lock(&state.status);
    if !status.is_success() {
        return (status, "upstream failure").into_response();
    }

    let body = lock(&state.body).clone();
    (status, [(CONTENT_TYPE, "application/json")], body).into_response()
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// JSON body for a list of `(id, name, price)` records.
#[must_use]
pub fn products_json(records: &[(&str, &str, i64)]) -> String {
    let items: Vec<serde_json::Value> = records
        .iter()
        .map(|(id, name, price)| serde_json::json!({"id": id, "name": name, "price": price}))
        .collect();
    serde_json::Value::Array(items).to_string()
}
