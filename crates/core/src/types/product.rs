//! Product records as received from a source and as served to readers.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// An untransformed product record as received from a product source.
///
/// Unknown JSON fields are ignored so upstreams may send richer payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProduct {
    pub id: ProductId,
    /// Free-form name exactly as the upstream spells it.
    pub name: String,
    /// Price in minor currency units (e.g., cents).
    pub price: i64,
}

impl RawProduct {
    /// Create a new raw product.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// A transformed, display-ready product held by the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayProduct {
    pub id: ProductId,
    /// Name with only the first letter capitalized.
    pub name: String,
    /// Formatted money string (e.g., "$12.53").
    pub price: String,
}

impl From<&RawProduct> for DisplayProduct {
    fn from(raw: &RawProduct) -> Self {
        crate::transform::transform(raw)
    }
}

impl From<RawProduct> for DisplayProduct {
    fn from(raw: RawProduct) -> Self {
        Self::from(&raw)
    }
}
