//! Cart page controller.

use std::rc::Rc;

use serde_json::Value;
use sleep_outside_core::{CartLineItem, ProductId, Quantity};
use tracing::instrument;

use super::events::{CartAction, EventRegistry, UiEvent};
use super::normalize::normalize;
use super::render::CartRenderer;
use super::totals::{item_count, summarize};
use super::{decode, decode_str};
use crate::config::CartConfig;
use crate::error::{Result, add_breadcrumb};
use crate::page::{CartPage, CountBadge};
use crate::storage::{KeyValueStore, Storage, StorageError, SubscriptionId};

/// Wires user interaction on the cart page to storage and display.
///
/// Holds no cart state of its own: every operation reads the persisted cart,
/// normalizes it, applies its change, writes the whole cart back and redraws
/// the page from what was written.
///
/// The item-count badge is subscribed to the cart key, so it follows every
/// write to the store, including writes made by other pages sharing it.
pub struct CartController<S: KeyValueStore> {
    storage: Storage<S>,
    key: String,
    renderer: CartRenderer,
    page: CartPage,
    registry: EventRegistry,
    badge_subscription: SubscriptionId,
}

impl<S: KeyValueStore> CartController<S> {
    /// Create a controller with its own item-count badge.
    #[must_use]
    pub fn new(store: S, config: &CartConfig) -> Self {
        Self::with_badge(store, config, CountBadge::new())
    }

    /// Create a controller driving an existing (shared) item-count badge.
    #[must_use]
    pub fn with_badge(store: S, config: &CartConfig, badge: CountBadge) -> Self {
        let subscriber = badge.clone();
        let badge_subscription = store.subscribe(
            &config.key,
            Rc::new(move |raw: &str| {
                subscriber.set_count(item_count(&normalize(decode_str(raw))));
            }),
        );

        Self {
            storage: Storage::new(store),
            key: config.key.clone(),
            renderer: CartRenderer::new(config.placeholder_image.clone()),
            page: CartPage::with_badge(badge),
            registry: EventRegistry::new(),
            badge_subscription,
        }
    }

    /// The page regions as of the last render.
    #[must_use]
    pub const fn page(&self) -> &CartPage {
        &self.page
    }

    /// Controls bound by the last render.
    #[must_use]
    pub const fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// The storage adapter this controller writes through.
    #[must_use]
    pub const fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    /// Read and normalize the persisted cart without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn items(&self) -> Result<Vec<CartLineItem>> {
        Ok(self.read()?)
    }

    /// Normalize the persisted cart, write the normalized form back and redraw.
    ///
    /// Writing back heals duplicates left behind by earlier writers.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written, or a template
    /// fails to render.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load_and_display(&mut self) -> Result<()> {
        let items = self.read()?;
        self.persist(&items)?;
        self.display(&items)
    }

    /// Redraw the page from the persisted cart without writing it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read, or a template fails to
    /// render.
    pub fn refresh(&mut self) -> Result<()> {
        let items = self.read()?;
        self.page.badge.set_count(item_count(&items));
        self.display(&items)
    }

    /// Remove every unit of a product. Unknown IDs leave the cart unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written, or a template
    /// fails to render.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove(&mut self, id: &ProductId) -> Result<()> {
        add_breadcrumb("cart", "Removed item", Some(&[("product_id", id.as_str())]));

        let mut items = self.read()?;
        let before = items.len();
        items.retain(|item| &item.id != id);
        if items.len() == before {
            tracing::debug!("Item not in cart, nothing removed");
        }

        self.persist(&items)?;
        self.load_and_display()
    }

    /// Set a line's quantity from raw input text.
    ///
    /// Input is coerced to a whole number of at least one. An ID that is not
    /// in the cart is ignored without touching the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written, or a template
    /// fails to render.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn set_quantity(&mut self, id: &ProductId, raw: &str) -> Result<()> {
        let quantity = Quantity::parse_input(raw);

        let mut items = self.read()?;
        let Some(item) = items.iter_mut().find(|item| &item.id == id) else {
            tracing::debug!("Item not in cart, quantity unchanged");
            return Ok(());
        };
        item.quantity = quantity;

        let quantity_text = quantity.to_string();
        add_breadcrumb(
            "cart",
            "Changed quantity",
            Some(&[("product_id", id.as_str()), ("quantity", quantity_text.as_str())]),
        );

        self.persist(&items)?;
        self.load_and_display()
    }

    /// Add a product to the cart, merging with an existing line for the same ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written, or a template
    /// fails to render.
    #[instrument(skip(self, item), fields(product_id = %item.id, quantity = %item.quantity))]
    pub fn add(&mut self, item: CartLineItem) -> Result<()> {
        add_breadcrumb("cart", "Added item", Some(&[("product_id", item.id.as_str())]));

        let mut items = self.read()?;
        items.push(item);

        self.persist(&normalize(items))?;
        self.load_and_display()
    }

    /// Route a UI event through the registry of the last render.
    ///
    /// Returns `false` if the event's target is not a bound cart control.
    ///
    /// # Errors
    ///
    /// Propagates errors from the resolved operation.
    pub fn dispatch(&mut self, event: &UiEvent) -> Result<bool> {
        let Some(action) = self.registry.resolve(event) else {
            tracing::debug!(control = %event.target(), "Ignoring event without a cart binding");
            return Ok(false);
        };

        match action {
            CartAction::Remove(id) => self.remove(&id)?,
            CartAction::SetQuantity { item, raw } => self.set_quantity(&item, &raw)?,
        }
        Ok(true)
    }

    fn read(&self) -> std::result::Result<Vec<CartLineItem>, StorageError> {
        let stored: Option<Value> = self.storage.get_json(&self.key)?;
        Ok(normalize(decode(stored)))
    }

    fn persist(&self, items: &[CartLineItem]) -> std::result::Result<(), StorageError> {
        self.storage.set_json(&self.key, items)
    }

    fn display(&mut self, items: &[CartLineItem]) -> Result<()> {
        let rendered = self.renderer.render(items)?;
        self.page.list.replace(rendered.markup);
        self.registry = rendered.registry;

        let summary = summarize(items);
        let text = CartRenderer::render_summary(summary.total.amount())?;
        self.page.summary.update(text, summary.visibility);

        tracing::debug!(lines = items.len(), total = %summary.total, "Cart displayed");
        Ok(())
    }
}

impl<S: KeyValueStore> Drop for CartController<S> {
    fn drop(&mut self) {
        self.storage.store().unsubscribe(self.badge_subscription);
    }
}
