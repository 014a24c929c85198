//! Shopping cart reconciliation and rendering.
//!
//! The persisted cart (one JSON array under [`CART_KEY`]) is the single source
//! of truth. Every user action is a full round trip:
//! read → [`normalize`] → mutate → persist → [`CartRenderer::render`] → [`summarize`].
//! The displayed page is therefore always a pure function of persisted state.

mod controller;
mod events;
mod normalize;
mod render;
mod totals;

use serde_json::Value;
use sleep_outside_core::CartLineItem;

pub use controller::CartController;
pub use events::{Binding, CartAction, ControlId, ControlKind, EventRegistry, UiEvent};
pub use normalize::normalize;
pub use render::{CartItemView, CartRenderer, DEFAULT_PLACEHOLDER_IMAGE, RenderError, RenderedCart};
pub use totals::{CartSummary, item_count, summarize, total};

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "so-cart";

/// Decode a stored cart value into line items.
///
/// Anything other than an array is an empty cart. Entries that are not objects
/// or carry no usable `Id` are skipped; any other entry is kept, whatever shape
/// its display fields have.
#[must_use]
pub fn decode(value: Option<Value>) -> Vec<CartLineItem> {
    let entries = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            tracing::warn!(kind = json_kind(&other), "Stored cart is not an array, treating as empty");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable cart entry");
                None
            }
        })
        .collect()
}

/// Decode a raw stored string (as handed to store subscribers).
#[must_use]
pub fn decode_str(raw: &str) -> Vec<CartLineItem> {
    decode(serde_json::from_str(raw).ok())
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_missing_or_null_is_empty() {
        assert!(decode(None).is_empty());
        assert!(decode(Some(Value::Null)).is_empty());
    }

    #[test]
    fn test_decode_non_array_is_empty() {
        assert!(decode(Some(json!({"Id": "A"}))).is_empty());
        assert!(decode(Some(json!("so-cart"))).is_empty());
    }

    #[test]
    fn test_decode_skips_unreadable_entries() {
        let items = decode(Some(json!([
            {"Id": "A", "Name": "Tent", "FinalPrice": 10, "Quantity": 2},
            {"Name": "no id"},
            42,
            {"Id": "B", "Name": "Bag", "FinalPrice": 5}
        ])));
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_decode_keeps_entries_with_odd_display_fields() {
        let items = decode(Some(json!([
            {"Id": "A", "Name": null, "FinalPrice": 10, "Quantity": 2},
            {"Id": "B", "Colors": [{"ColorName": null}]},
            {"Id": "C", "Colors": "Red"},
            {"Id": 42, "Images": "none"}
        ])));
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C", "42"]);
    }

    #[test]
    fn test_decode_str_garbage_is_empty() {
        assert!(decode_str("][").is_empty());
        assert_eq!(decode_str(r#"[{"Id":"A"}]"#).len(), 1);
    }
}
