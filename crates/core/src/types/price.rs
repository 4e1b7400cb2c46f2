//! Type-safe price representation using decimal arithmetic.
//!
//! Upstream sources report prices as integers in the currency's minor unit
//! (cents for USD). [`Price::from_minor_units`] moves the decimal point two
//! places, which is exact in `Decimal`, so display formatting never picks up
//! binary floating-point noise.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of minor units per major unit, expressed as a decimal scale.
const MINOR_UNIT_SCALE: u32 = 2;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from an integer amount of minor units (e.g., cents).
    ///
    /// ```rust
    /// # use greenbox_core::{CurrencyCode, Price};
    /// let price = Price::from_minor_units(1253, CurrencyCode::USD);
    /// assert_eq!(price.display(), "$12.53");
    /// ```
    #[must_use]
    pub fn from_minor_units(minor_units: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(minor_units, MINOR_UNIT_SCALE), currency_code)
    }

    /// Format for display with exactly two decimal places (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor_units_display() {
        assert_eq!(
            Price::from_minor_units(1253, CurrencyCode::USD).display(),
            "$12.53"
        );
        assert_eq!(
            Price::from_minor_units(1245, CurrencyCode::USD).display(),
            "$12.45"
        );
        assert_eq!(Price::from_minor_units(0, CurrencyCode::USD).display(), "$0.00");
    }

    #[test]
    fn test_display_pads_whole_amounts() {
        assert_eq!(
            Price::from_minor_units(500, CurrencyCode::USD).display(),
            "$5.00"
        );
        assert_eq!(Price::from_minor_units(7, CurrencyCode::USD).display(), "$0.07");
    }

    #[test]
    fn test_other_currency_symbols() {
        assert_eq!(
            Price::from_minor_units(999, CurrencyCode::EUR).display(),
            "€9.99"
        );
        assert_eq!(
            Price::from_minor_units(100, CurrencyCode::GBP).to_string(),
            "£1.00"
        );
    }

    #[test]
    fn test_currency_code_default_is_usd() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::USD);
        assert_eq!(CurrencyCode::default().code(), "USD");
    }
}
