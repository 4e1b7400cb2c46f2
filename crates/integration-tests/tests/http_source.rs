//! Integration tests for the live HTTP product source.
//!
//! Each test starts its own local upstream, so no external services are needed.

use std::time::Duration;

use axum::http::StatusCode;
use greenbox_catalog::config::HttpSourceConfig;
use greenbox_catalog::source::{HttpProductSource, ProductSource, SourceError};
use greenbox_core::RawProduct;
use greenbox_integration_tests::{Upstream, products_json};
use secrecy::SecretString;

fn source_for(upstream: &Upstream, token: Option<&str>) -> HttpProductSource {
    HttpProductSource::new(&HttpSourceConfig {
        url: upstream.url(),
        api_token: token.map(SecretString::from),
        timeout: Duration::from_millis(500),
    })
    .expect("Failed to build HTTP source")
}

#[tokio::test]
async fn test_fetch_all_preserves_order() {
    let upstream = Upstream::start(products_json(&[
        ("2", "BLUE SOAP", 1253),
        ("1", "green soap", 1245),
    ]))
    .await;
    let source = source_for(&upstream, None);

    let products = source.fetch_all().await.expect("fetch should succeed");

    assert_eq!(
        products,
        vec![
            RawProduct::new("2", "BLUE SOAP", 1253),
            RawProduct::new("1", "green soap", 1245),
        ]
    );
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_fetch_all_empty_array() {
    let upstream = Upstream::start("[]").await;
    let products = source_for(&upstream, None)
        .fetch_all()
        .await
        .expect("fetch should succeed");
    assert!(products.is_empty());
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let upstream = Upstream::start("[]").await;
    let source = source_for(&upstream, Some("gbx_live_4kQ9"));

    source.fetch_all().await.expect("fetch should succeed");

    assert_eq!(
        upstream.last_authorization().as_deref(),
        Some("Bearer gbx_live_4kQ9")
    );
}

#[tokio::test]
async fn test_no_token_sends_no_authorization() {
    let upstream = Upstream::start("[]").await;
    source_for(&upstream, None)
        .fetch_all()
        .await
        .expect("fetch should succeed");
    assert!(upstream.last_authorization().is_none());
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let upstream = Upstream::start("[]").await;
    upstream.set_status(StatusCode::INTERNAL_SERVER_ERROR);

    let err = source_for(&upstream, None).fetch_all().await.unwrap_err();

    match err {
        SourceError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream failure");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_record_fails_whole_fetch() {
    let upstream = Upstream::start(r#"[{"id":"1","name":"ok","price":100},{"id":"2","name":"no price"}]"#).await;

    let err = source_for(&upstream, None).fetch_all().await.unwrap_err();
    assert!(matches!(err, SourceError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_non_array_body_is_parse_error() {
    let upstream = Upstream::start(r#"{"products": []}"#).await;

    let err = source_for(&upstream, None).fetch_all().await.unwrap_err();
    assert!(matches!(err, SourceError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let upstream = Upstream::start("[]").await;
    upstream.set_delay(Duration::from_secs(5));

    let err = source_for(&upstream, None).fetch_all().await.unwrap_err();
    match err {
        SourceError::Http(e) => assert!(e.is_timeout(), "expected timeout, got {e}"),
        other => panic!("expected HTTP error, got {other:?}"),
    }
}
