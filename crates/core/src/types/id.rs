//! Opaque product identifiers.
//!
//! Upstream sources hand out product IDs as strings with no structure we can
//! rely on, so the wrapper only exists to keep them from being mixed up with
//! names or other free-form text.

use serde::{Deserialize, Serialize};

/// Identifier of a product as assigned by the upstream source.
///
/// Serialized transparently as the underlying string.
///
/// # Example
///
/// ```rust
/// # use greenbox_core::ProductId;
/// let id = ProductId::new("sku-42");
/// assert_eq!(id.as_str(), "sku-42");
/// assert_eq!(id.to_string(), "sku-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the ID and return the underlying string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ::core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
