//! Line item quantity.
//!
//! A [`Quantity`] is always a positive integer. Stored cart data and user input
//! are both untrusted, so every way of building one from outside data coerces
//! instead of failing: anything that is not a number of at least one becomes one.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A positive number of units of one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// The smallest valid quantity.
    pub const ONE: Self = Self(1);

    /// Create a quantity, rejecting zero.
    #[must_use]
    pub const fn new(n: u32) -> Option<Self> {
        if n == 0 { None } else { Some(Self(n)) }
    }

    /// Create a quantity, clamping zero up to one.
    #[must_use]
    pub const fn clamped(n: u32) -> Self {
        if n == 0 { Self::ONE } else { Self(n) }
    }

    /// Get the number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Leniently read a stored quantity.
    ///
    /// Numbers and numeric strings are floored; missing, `null`, non-numeric,
    /// non-finite and sub-one values all become one.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite() && *n >= 1.0)
            .map_or(Self::ONE, |n| {
                // Saturating float-to-int cast; the filter above guarantees n >= 1.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let whole = n.floor() as u32;
                Self::clamped(whole)
            })
    }

    /// Parse a quantity typed into the quantity input.
    ///
    /// Reads an optional sign followed by leading digits and ignores the rest, so
    /// `"3 tents"` is three. Empty, non-numeric, zero and negative input snap to one.
    #[must_use]
    pub fn parse_input(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        let (negative, rest) = trimmed.strip_prefix('-').map_or_else(
            || (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
            |rest| (true, rest),
        );
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        if negative || digits.is_empty() {
            return Self::ONE;
        }
        digits
            .parse::<u32>()
            .map_or(Self(u32::MAX), Self::clamped)
    }

    /// Add two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}
