//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are persisted as plain JSON numbers (`"FinalPrice": 199.99`) by the
//! product catalog, so [`Price`] serializes to and from a number while doing all
//! arithmetic in [`Decimal`] to avoid float drift in cart totals. Numeric
//! strings are read too, and normalized to numbers when written back.

use core::fmt;
use core::iter::Sum;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::quantity::Quantity;

/// Errors that can occur when parsing a [`Price`] from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a decimal number (got '{0}')")]
    NotANumber(String),
    /// The input is negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A unit price in the store currency (USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Parse a non-negative price from user input such as `"19.99"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a decimal number or is negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|_| PriceError::NotANumber(s.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Leniently read a price from a stored JSON value.
    ///
    /// Numbers and numeric strings are accepted; anything else (missing, `null`,
    /// garbage) is worth nothing.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let amount = match value {
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .ok()
                .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
            Value::String(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        };
        amount.map_or(Self::ZERO, Self)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this price is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity.get()))
                .unwrap_or(Decimal::MAX),
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(
            iter.fold(Decimal::ZERO, |acc, price| {
                acc.checked_add(price.0).unwrap_or(Decimal::MAX)
            }),
        )
    }
}

/// Always written as a JSON number, whatever the stored representation was:
/// a `FinalPrice` of `"19.99"` comes back as `19.99` after the next write.
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}
