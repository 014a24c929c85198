//! Cart totals and item count.

use sleep_outside_core::{CartLineItem, Price};

use crate::page::Visibility;

/// Total price and summary visibility for one render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    pub total: Price,
    pub visibility: Visibility,
}

/// Sum of price times quantity over the given (normalized) items.
#[must_use]
pub fn total(items: &[CartLineItem]) -> Price {
    items.iter().map(CartLineItem::line_total).sum()
}

/// Sum of quantities, for the item-count badge.
#[must_use]
pub fn item_count(items: &[CartLineItem]) -> u32 {
    items
        .iter()
        .fold(0_u32, |acc, item| acc.saturating_add(item.quantity.get()))
}

/// Total the cart and decide whether the summary region is shown.
///
/// The summary is hidden exactly when the total is zero. A cart holding only
/// zero-priced items is hidden too.
#[must_use]
pub fn summarize(items: &[CartLineItem]) -> CartSummary {
    let total = total(items);
    let visibility = if total.is_zero() {
        Visibility::Hidden
    } else {
        Visibility::Visible
    };
    CartSummary { total, visibility }
}
