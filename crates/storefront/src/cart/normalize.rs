//! Duplicate line item merging.

use std::collections::HashMap;

use sleep_outside_core::{CartLineItem, ProductId};

/// Collapse line items sharing an `Id` into one, summing their quantities.
///
/// The first occurrence of each `Id` is kept as the representative (name, price,
/// images, any extra catalog fields) and keeps its position; later duplicates
/// only contribute their quantity. Quantities were already coerced to at least
/// one when the items were decoded.
#[must_use]
pub fn normalize(items: impl IntoIterator<Item = CartLineItem>) -> Vec<CartLineItem> {
    let mut merged: Vec<CartLineItem> = Vec::new();
    let mut positions: HashMap<ProductId, usize> = HashMap::new();

    for item in items {
        if let Some(existing) = positions.get(&item.id).and_then(|&pos| merged.get_mut(pos)) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            positions.insert(item.id.clone(), merged.len());
            merged.push(item);
        }
    }

    merged
}
