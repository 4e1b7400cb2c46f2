//! Integration tests for the catalog HTTP API.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use greenbox_catalog::cache::{CacheSettings, ProductCache};
use greenbox_catalog::config::HttpSourceConfig;
use greenbox_catalog::routes;
use greenbox_catalog::source::{HttpProductSource, InMemoryProductSource, ProductSource};
use greenbox_catalog::state::AppState;
use greenbox_core::RawProduct;
use greenbox_integration_tests::{Upstream, products_json};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app_from(source: Arc<dyn ProductSource>) -> (axum::Router, ProductCache) {
    let cache = ProductCache::start(source, CacheSettings::new(Duration::from_secs(3600))).await;
    let app = routes::routes().with_state(AppState::new(cache.clone()));
    (app, cache)
}

async fn app_with(products: Vec<RawProduct>) -> (axum::Router, ProductCache) {
    app_from(Arc::new(InMemoryProductSource::new(products))).await
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    send(app, Method::GET, uri).await
}

async fn send(app: axum::Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("router is infallible");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    (status, body.to_vec())
}

fn soaps() -> Vec<RawProduct> {
    vec![
        RawProduct::new("1", "BLUE SOAP", 1253),
        RawProduct::new("2", "green soap", 1245),
    ]
}

#[tokio::test]
async fn test_health() {
    let (app, _cache) = app_with(soaps()).await;
    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_list_products() {
    let (app, _cache) = app_with(soaps()).await;
    let (status, body) = get(app, "/api/products").await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).expect("JSON body");
    assert_eq!(
        value,
        json!([
            {"id": "1", "name": "Blue soap", "price": "$12.53"},
            {"id": "2", "name": "Green soap", "price": "$12.45"},
        ])
    );
}

#[tokio::test]
async fn test_show_product() {
    let (app, _cache) = app_with(soaps()).await;
    let (status, body) = get(app, "/api/products/2").await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).expect("JSON body");
    assert_eq!(value["name"], "Green soap");
}

#[tokio::test]
async fn test_show_missing_product_is_404() {
    let (app, _cache) = app_with(soaps()).await;
    let (status, _) = get(app, "/api/products/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_readiness_follows_cache_lifecycle() {
    let (app, cache) = app_with(soaps()).await;

    let (status, body) = get(app.clone(), "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).expect("JSON body");
    assert_eq!(value["status"], "ready");
    assert_eq!(value["products"], 2);
    assert_eq!(value["consecutive_failures"], 0);

    cache.stop().await;
    let (status, body) = get(app.clone(), "/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let value: Value = serde_json::from_slice(&body).expect("JSON body");
    assert_eq!(value["status"], "stopped");

    // Reads still serve the last snapshot after stop
    let (status, body) = get(app, "/api/products").await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).expect("JSON body");
    assert_eq!(value.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_readiness_with_empty_upstream_list() {
    let (app, _cache) = app_with(Vec::new()).await;
    // An empty list is still a successful load
    let (status, _) = get(app, "/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_returns_new_count() {
    let upstream = Upstream::start(products_json(&[("a", "BLUE SOAP", 1253)])).await;
    let source = HttpProductSource::new(&HttpSourceConfig {
        url: upstream.url(),
        api_token: None,
        timeout: Duration::from_secs(2),
    })
    .expect("Failed to build HTTP source");
    let (app, _cache) = app_from(Arc::new(source)).await;

    upstream.set_body(products_json(&[
        ("a", "BLUE SOAP", 1253),
        ("b", "green soap", 1245),
    ]));
    let (status, body) = send(app.clone(), Method::POST, "/api/refresh").await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).expect("JSON body");
    assert_eq!(value, json!({"refreshed": 2}));

    let (_, body) = get(app, "/api/products/b").await;
    let value: Value = serde_json::from_slice(&body).expect("JSON body");
    assert_eq!(value["name"], "Green soap");
}

#[tokio::test]
async fn test_refresh_upstream_failure_is_502_and_keeps_products() {
    let upstream = Upstream::start(products_json(&[("a", "BLUE SOAP", 1253)])).await;
    let source = HttpProductSource::new(&HttpSourceConfig {
        url: upstream.url(),
        api_token: None,
        timeout: Duration::from_secs(2),
    })
    .expect("Failed to build HTTP source");
    let (app, _cache) = app_from(Arc::new(source)).await;

    upstream.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    let (status, body) = send(app.clone(), Method::POST, "/api/refresh").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    // Upstream details are not echoed to the client
    assert_eq!(body, b"External service error");

    let (status, body) = get(app, "/api/products").await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).expect("JSON body");
    assert_eq!(value.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_refresh_after_stop_is_503() {
    let (app, cache) = app_with(soaps()).await;
    cache.stop().await;

    let (status, _) = send(app.clone(), Method::POST, "/api/refresh").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = get(app, "/api/refresh").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
