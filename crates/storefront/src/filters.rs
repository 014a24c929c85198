//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Formats an amount as dollars with two decimal places.
///
/// Values that are not decimal numbers are passed through behind a `$`.
///
/// Usage in templates: `{{ item.price|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    let trimmed = raw.trim().trim_start_matches('$');
    Ok(Decimal::from_str(trimmed).map_or_else(
        |_| format!("${trimmed}"),
        |amount| format!("${amount:.2}"),
    ))
}
