//! Live product source backed by an upstream HTTP endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use greenbox_core::RawProduct;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};
use url::Url;

use crate::config::HttpSourceConfig;

use super::{ProductSource, SourceError};

/// Characters of an upstream body kept in logs and errors.
const BODY_PREVIEW_CHARS: usize = 200;

/// Fetches the product list with a single `GET` to the configured URL.
///
/// The upstream must answer with a JSON array of `{id, name, price}` objects.
/// A single malformed record fails the whole fetch.
#[derive(Clone)]
pub struct HttpProductSource {
    inner: Arc<HttpProductSourceInner>,
}

struct HttpProductSourceInner {
    client: reqwest::Client,
    url: Url,
}

impl HttpProductSource {
    /// Create a new HTTP product source.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &HttpSourceConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| {
                    SourceError::InvalidConfig(format!("Invalid API token format: {e}"))
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpProductSourceInner {
                client,
                url: config.url.clone(),
            }),
        })
    }

    /// The endpoint this source reads from.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.inner.url
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    #[instrument(skip(self), fields(url = %self.inner.url))]
    async fn fetch_all(&self) -> Result<Vec<RawProduct>, SourceError> {
        let response = self
            .inner
            .client
            .get(self.inner.url.clone())
            .send()
            .await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let message = preview(&body);
            debug!(
                status = %status,
                body = %message,
                "Products endpoint returned non-success status"
            );
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let products: Vec<RawProduct> = serde_json::from_str(&body).map_err(|e| {
            debug!(
                error = %e,
                body = %preview(&body),
                "Failed to parse products response"
            );
            SourceError::Parse(e)
        })?;

        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
