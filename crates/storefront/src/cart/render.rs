//! Cart list markup.

use askama::Template;
use rust_decimal::Decimal;
use sleep_outside_core::CartLineItem;
use thiserror::Error;

use super::events::{ControlId, ControlKind, EventRegistry};
use crate::filters;

/// Image shown when a product has none.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/images/placeholder.svg";

/// Template rendering failed.
#[derive(Debug, Error)]
#[error("Template error: {0}")]
pub struct RenderError(#[from] askama::Error);

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub color: String,
    pub quantity: u32,
    pub price: Decimal,
    pub remove_control: ControlId,
    pub quantity_control: ControlId,
}

/// Cart items fragment template.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
struct CartItemsTemplate<'a> {
    items: &'a [CartItemView],
}

/// Cart total fragment template.
#[derive(Template)]
#[template(path = "partials/cart_summary.html")]
struct CartSummaryTemplate {
    total: Decimal,
}

/// Output of one render: the list markup and the controls it contains.
#[derive(Debug, Clone)]
pub struct RenderedCart {
    pub markup: String,
    pub registry: EventRegistry,
}

/// Turns normalized line items into list markup.
#[derive(Debug, Clone)]
pub struct CartRenderer {
    placeholder_image: String,
}

impl Default for CartRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_IMAGE)
    }
}

impl CartRenderer {
    /// Create a renderer falling back to `placeholder_image`.
    #[must_use]
    pub fn new(placeholder_image: impl Into<String>) -> Self {
        Self {
            placeholder_image: placeholder_image.into(),
        }
    }

    /// Build the display record for one line.
    #[must_use]
    pub fn view(&self, index: usize, item: &CartLineItem) -> CartItemView {
        CartItemView {
            id: item.id.to_string(),
            name: item.name.clone(),
            image: item
                .image_src()
                .unwrap_or(self.placeholder_image.as_str())
                .to_owned(),
            color: item.primary_color().to_owned(),
            quantity: item.quantity.get(),
            price: item.final_price.amount(),
            remove_control: ControlId::new(format!("cart-item-{index}-remove")),
            quantity_control: ControlId::new(format!("cart-item-{index}-quantity")),
        }
    }

    /// Render the full list contents and bind each line's controls.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render(&self, items: &[CartLineItem]) -> Result<RenderedCart, RenderError> {
        let views: Vec<CartItemView> = items
            .iter()
            .enumerate()
            .map(|(index, item)| self.view(index, item))
            .collect();

        let mut registry = EventRegistry::new();
        for (view, item) in views.iter().zip(items) {
            registry.bind(view.remove_control.clone(), ControlKind::Remove, item.id.clone());
            registry.bind(view.quantity_control.clone(), ControlKind::Quantity, item.id.clone());
        }

        let markup = CartItemsTemplate { items: &views }.render()?;
        Ok(RenderedCart { markup, registry })
    }

    /// Render the summary text for a total.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render_summary(total: Decimal) -> Result<String, RenderError> {
        Ok(CartSummaryTemplate { total }.render()?)
    }
}
