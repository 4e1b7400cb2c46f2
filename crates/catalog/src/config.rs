//! Catalog configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GREENBOX_PRODUCTS_URL` - Upstream products endpoint (only when the
//!   product source is `http`)
//!
//! ## Optional
//! - `GREENBOX_HOST` - Bind address (default: 127.0.0.1)
//! - `GREENBOX_PORT` - Listen port (default: 4000)
//! - `GREENBOX_PRODUCT_SOURCE` - `http` or `in-memory` (default: http)
//! - `GREENBOX_PRODUCTS_TOKEN` - Bearer token sent to the upstream endpoint
//! - `GREENBOX_FETCH_TIMEOUT_SECS` - Upstream request timeout (default: 30)
//! - `GREENBOX_REFRESH_INTERVAL_SECS` - Cache refresh period (default: 600)
//! - `GREENBOX_FAKE_PRODUCT_COUNT` - Size of the in-memory product list (default: 12)
//! - `GREENBOX_FAKE_SEED` - Seed for the in-memory product list (default: random)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::cache::MAX_REFRESH_INTERVAL;

const DEFAULT_REFRESH_INTERVAL_SECS: &str = "600";
const DEFAULT_FETCH_TIMEOUT_SECS: &str = "30";
const DEFAULT_FAKE_PRODUCT_COUNT: &str = "12";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Catalog service configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Which product source feeds the cache
    pub source: SourceConfig,
    /// Fixed period between cache refreshes
    pub refresh_interval: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
}

/// Product source selection, decided once at deployment time.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    /// Live upstream HTTP endpoint.
    Http(HttpSourceConfig),
    /// Deterministic in-process stand-in.
    InMemory(InMemorySourceConfig),
}

/// Upstream HTTP endpoint configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct HttpSourceConfig {
    /// Endpoint answering `GET` with a JSON array of products
    pub url: Url,
    /// Optional bearer token
    pub api_token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for HttpSourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSourceConfig")
            .field("url", &self.url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// In-memory stand-in configuration.
#[derive(Debug, Clone, Default)]
pub struct InMemorySourceConfig {
    /// Number of generated products
    pub product_count: usize,
    /// Seed for the generator; `None` picks one at startup
    pub seed: Option<u64>,
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the upstream token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.parse_or("GREENBOX_HOST", "127.0.0.1")?;
        let port = env.parse_or("GREENBOX_PORT", "4000")?;
        let source = SourceConfig::from_env(&env)?;

        let refresh_secs: u64 =
            env.parse_or("GREENBOX_REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_INTERVAL_SECS)?;
        if refresh_secs == 0 || refresh_secs > MAX_REFRESH_INTERVAL.as_secs() {
            return Err(ConfigError::InvalidEnvVar(
                "GREENBOX_REFRESH_INTERVAL_SECS".to_string(),
                format!(
                    "must be between 1 and {} seconds",
                    MAX_REFRESH_INTERVAL.as_secs()
                ),
            ));
        }

        Ok(Self {
            host,
            port,
            source,
            refresh_interval: Duration::from_secs(refresh_secs),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", "1.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SourceConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = env.or_default("GREENBOX_PRODUCT_SOURCE", "http");
        match kind.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http(HttpSourceConfig::from_env(env)?)),
            "in-memory" | "memory" => Ok(Self::InMemory(InMemorySourceConfig {
                product_count: env
                    .parse_or("GREENBOX_FAKE_PRODUCT_COUNT", DEFAULT_FAKE_PRODUCT_COUNT)?,
                seed: env.parse_optional("GREENBOX_FAKE_SEED")?,
            })),
            other => Err(ConfigError::InvalidEnvVar(
                "GREENBOX_PRODUCT_SOURCE".to_string(),
                format!("unknown product source '{other}' (expected 'http' or 'in-memory')"),
            )),
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::InMemory(_) => "in-memory",
        }
    }
}

impl HttpSourceConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = env.required("GREENBOX_PRODUCTS_URL")?;
        let url = Url::parse(&url).map_err(|e| {
            ConfigError::InvalidEnvVar("GREENBOX_PRODUCTS_URL".to_string(), e.to_string())
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "GREENBOX_PRODUCTS_URL".to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        let api_token = match env.optional("GREENBOX_PRODUCTS_TOKEN") {
            Some(token) => {
                reject_placeholder(&token, "GREENBOX_PRODUCTS_TOKEN")?;
                Some(SecretString::from(token))
            }
            None => None,
        };

        let timeout_secs: u64 =
            env.parse_or("GREENBOX_FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "GREENBOX_FETCH_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            url,
            api_token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Typed access to a key lookup.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        parse_value(key, &self.or_default(key, default))
    }

    /// Parse a variable that has no default.
    fn parse_optional<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional(key)
            .map(|value| parse_value(key, &value))
            .transpose()
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Reject tokens that were obviously copied from a template.
fn reject_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }
    Ok(())
}
