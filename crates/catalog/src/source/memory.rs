//! In-process product source for local development and tests.

use async_trait::async_trait;
use greenbox_core::RawProduct;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ProductSource, SourceError};

/// Product names the generator draws from, deliberately in mixed case so the
/// display transformation is visible.
const SAMPLE_NAMES: &[&str] = &[
    "BLUE SOAP",
    "green soap",
    "Lavender BAR",
    "oatmeal scrub",
    "CEDAR shampoo bar",
    "citrus hand cream",
    "BAMBOO toothbrush",
    "beeswax wraps",
    "ROSE clay mask",
    "mint lip balm",
    "Charcoal Soap",
    "shea body butter",
];

/// Price range of generated products, in cents.
const MIN_PRICE_CENTS: i64 = 199;
const MAX_PRICE_CENTS: i64 = 4_999;

/// Returns the same product list on every fetch.
///
/// Lists are either supplied verbatim or generated once from a seed, so a
/// given seed always yields the same products.
#[derive(Debug, Clone)]
pub struct InMemoryProductSource {
    products: Vec<RawProduct>,
}

impl InMemoryProductSource {
    /// Serve a fixed list of products.
    #[must_use]
    pub const fn new(products: Vec<RawProduct>) -> Self {
        Self { products }
    }

    /// Generate `count` products from `seed`.
    #[must_use]
    pub fn seeded(count: usize, seed: u64) -> Self {
        Self::generate(count, &mut StdRng::seed_from_u64(seed))
    }

    /// Generate `count` products from a seed picked at startup.
    #[must_use]
    pub fn random(count: usize) -> Self {
        let seed: u64 = rand::rng().random();
        tracing::debug!(seed, "Generating in-memory products");
        Self::seeded(count, seed)
    }

    fn generate(count: usize, rng: &mut impl Rng) -> Self {
        let products = (0..count)
            .map(|n| {
                let name = SAMPLE_NAMES
                    .get(rng.random_range(0..SAMPLE_NAMES.len()))
                    .copied()
                    .unwrap_or("soap");
                RawProduct::new(
                    (n + 1).to_string(),
                    name,
                    rng.random_range(MIN_PRICE_CENTS..=MAX_PRICE_CENTS),
                )
            })
            .collect();
        Self { products }
    }

    /// The list this source serves.
    #[must_use]
    pub fn products(&self) -> &[RawProduct] {
        &self.products
    }
}

#[async_trait]
impl ProductSource for InMemoryProductSource {
    async fn fetch_all(&self) -> Result<Vec<RawProduct>, SourceError> {
        Ok(self.products.clone())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_list_is_returned_in_order() {
        let products = vec![
            RawProduct::new("b", "second", 200),
            RawProduct::new("a", "first", 100),
        ];
        let source = InMemoryProductSource::new(products.clone());
        assert_eq!(source.fetch_all().await.unwrap(), products);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let a = InMemoryProductSource::seeded(20, 1234);
        let b = InMemoryProductSource::seeded(20, 1234);
        assert_eq!(a.products(), b.products());
    }

    #[test]
    fn test_generated_products_are_well_formed() {
        let source = InMemoryProductSource::seeded(30, 99);
        assert_eq!(source.products().len(), 30);
        for (n, product) in source.products().iter().enumerate() {
            assert_eq!(product.id.as_str(), (n + 1).to_string());
            assert!(SAMPLE_NAMES.contains(&product.name.as_str()));
            assert!((MIN_PRICE_CENTS..=MAX_PRICE_CENTS).contains(&product.price));
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        assert!(InMemoryProductSource::random(0).products().is_empty());
    }
}
