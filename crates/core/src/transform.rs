//! Record transformation from [`RawProduct`] to [`DisplayProduct`].
//!
//! All functions here are pure and total.

use crate::types::{CurrencyCode, DisplayProduct, Price, RawProduct};

/// Lowercase the whole name, then uppercase its first character.
///
/// Case mapping is ASCII-only so results do not depend on locale. Non-ASCII
/// characters pass through unchanged.
///
/// ```rust
/// # use greenbox_core::capitalize_name;
/// assert_eq!(capitalize_name("BLUE SOAP"), "Blue soap");
/// assert_eq!(capitalize_name(""), "");
/// ```
#[must_use]
pub fn capitalize_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(lower.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Format an integer amount of cents as a dollar string with two decimals.
///
/// ```rust
/// # use greenbox_core::price_to_money;
/// assert_eq!(price_to_money(1253), "$12.53");
/// assert_eq!(price_to_money(0), "$0.00");
/// ```
#[must_use]
pub fn price_to_money(cents: i64) -> String {
    Price::from_minor_units(cents, CurrencyCode::USD).display()
}

/// Map one raw record to its display form. The ID is copied unchanged.
#[must_use]
pub fn transform(raw: &RawProduct) -> DisplayProduct {
    DisplayProduct {
        id: raw.id.clone(),
        name: capitalize_name(&raw.name),
        price: price_to_money(raw.price),
    }
}
