//! Type-safe unit price using decimal arithmetic.
//!
//! Prices arrive from clients as JSON numbers (`2.50`) and are written back
//! the same way, so the wire format stays a plain number while the value is
//! held as a [`Decimal`] and never goes through binary floating point maths.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative unit price in the shop's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] Decimal);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_number_round_trips_as_number() {
        let price: Price = serde_json::from_str("2.50").unwrap();
        assert_eq!(price, Price::from_cents(250).unwrap());
        assert_eq!(serde_json::to_value(price).unwrap(), serde_json::json!(2.5));
    }

    #[test]
    fn test_integer_json_is_accepted() {
        let price: Price = serde_json::from_str("3").unwrap();
        assert_eq!(price, Price::new(Decimal::new(3, 0)).unwrap());
    }

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            Price::from_cents(-1),
            Err(PriceError::Negative(_))
        ));
        assert!(serde_json::from_str::<Price>("-0.01").is_err());
    }

    #[test]
    fn test_zero_is_allowed() {
        assert_eq!(Price::from_cents(0).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_display_uses_two_decimal_places() {
        assert_eq!(Price::from_cents(250).unwrap().to_string(), "2.50");
    }
}
