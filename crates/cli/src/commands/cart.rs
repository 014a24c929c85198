//! Cart commands.
//!
//! Each command runs one round trip of the cart cycle against the on-disk store
//! and prints the resulting page: list markup, then the summary when visible.

use std::error::Error;
use std::io::{self, Write};

use sleep_outside_core::{CartLineItem, Price, ProductColor, ProductId, Quantity};
use sleep_outside_storefront::cart::{CartController, ControlId, UiEvent};
use sleep_outside_storefront::storage::FileStore;
use tracing::{info, warn};

/// Controller over the on-disk store.
pub type Controller = CartController<FileStore>;

type CommandResult = Result<(), Box<dyn Error>>;

/// Product details for `add`.
pub struct NewItem {
    pub id: String,
    pub name: String,
    pub price: Price,
    pub quantity: Option<String>,
    pub image: Option<String>,
    pub color: Option<String>,
}

impl NewItem {
    fn into_line_item(self) -> CartLineItem {
        let quantity = self
            .quantity
            .as_deref()
            .map_or(Quantity::ONE, Quantity::parse_input);
        let mut item = CartLineItem::new(self.id, self.name, self.price).with_quantity(quantity);
        item.image = self.image;
        item.colors = self.color.map(|color_name| {
            vec![ProductColor {
                color_name,
                ..ProductColor::default()
            }]
        });
        item
    }
}

/// Display the cart.
pub fn show(cart: &mut Controller) -> CommandResult {
    cart.load_and_display()?;
    print_page(cart)
}

/// Add a product, merging with an existing line.
pub fn add(cart: &mut Controller, item: NewItem) -> CommandResult {
    let item = item.into_line_item();
    info!(product_id = %item.id, quantity = %item.quantity, "Adding to cart");
    cart.add(item)?;
    print_page(cart)
}

/// Remove a product.
pub fn remove(cart: &mut Controller, id: &str) -> CommandResult {
    cart.remove(&ProductId::new(id))?;
    print_page(cart)
}

/// Set a line's quantity from raw text.
pub fn set_quantity(cart: &mut Controller, id: &str, raw: &str) -> CommandResult {
    cart.set_quantity(&ProductId::new(id), raw)?;
    // Unknown IDs neither write nor redraw; draw what is stored without healing it.
    cart.refresh()?;
    print_page(cart)
}

/// Print the item-count badge value.
pub fn count(cart: &mut Controller) -> CommandResult {
    cart.load_and_display()?;
    let mut out = io::stdout().lock();
    writeln!(out, "{}", cart.page().badge.count())?;
    Ok(())
}

/// Simulate a click on a rendered control.
pub fn click(cart: &mut Controller, control: &str) -> CommandResult {
    dispatch(
        cart,
        &UiEvent::Click {
            target: ControlId::new(control),
        },
    )
}

/// Simulate a value change on a rendered input.
pub fn change(cart: &mut Controller, control: &str, value: &str) -> CommandResult {
    dispatch(
        cart,
        &UiEvent::Change {
            target: ControlId::new(control),
            value: value.to_string(),
        },
    )
}

fn dispatch(cart: &mut Controller, event: &UiEvent) -> CommandResult {
    // Controls only exist once the list has been rendered.
    cart.load_and_display()?;
    if !cart.dispatch(event)? {
        warn!(control = %event.target(), "No cart control with that id");
    }
    print_page(cart)
}

fn print_page(cart: &Controller) -> CommandResult {
    let page = cart.page();
    let mut out = io::stdout().lock();

    let list = page.list.markup().trim();
    if list.is_empty() {
        writeln!(out, "Your cart is empty.")?;
    } else {
        writeln!(out, "{list}")?;
    }
    if page.summary.visibility().is_visible() {
        writeln!(out, "{}", page.summary.text().trim())?;
    }

    let badge = page.badge.render()?;
    if !badge.trim().is_empty() {
        writeln!(out, "{}", badge.trim())?;
    }
    Ok(())
}
