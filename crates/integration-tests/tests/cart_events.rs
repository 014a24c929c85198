//! Integration tests for UI events routed through the rendered cart controls.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::rc::Rc;

use serde_json::json;
use sleep_outside_core::ProductId;
use sleep_outside_integration_tests::{CART_KEY, TestStore, duplicated_cart};
use sleep_outside_storefront::cart::{Binding, CartController, ControlId, ControlKind, UiEvent};
use sleep_outside_storefront::config::CartConfig;
use sleep_outside_storefront::page::CountBadge;
use sleep_outside_storefront::storage::{KeyValueStore, MemoryStore};

fn click(control: &str) -> UiEvent {
    UiEvent::Click {
        target: ControlId::new(control),
    }
}

fn change(control: &str, value: &str) -> UiEvent {
    UiEvent::Change {
        target: ControlId::new(control),
        value: value.to_string(),
    }
}

#[test]
fn test_render_binds_controls_to_lines() {
    let store = TestStore::seeded(&duplicated_cart());
    let mut cart = store.controller();
    cart.load_and_display().unwrap();

    let registry = cart.registry();
    assert_eq!(registry.len(), 4, "one remove and one quantity control per line");
    assert_eq!(
        registry.binding(&ControlId::new("cart-item-1-remove")),
        Some(&Binding {
            kind: ControlKind::Remove,
            item: ProductId::new("985PR"),
        })
    );
    assert_eq!(
        registry
            .binding(&ControlId::new("cart-item-0-quantity"))
            .map(|b| b.item.as_str()),
        Some("880RR")
    );

    let markup = cart.page().list.markup();
    assert!(markup.contains(r#"id="cart-item-0-remove""#));
    assert!(markup.contains(r#"id="cart-item-1-quantity""#));
}

#[test]
fn test_click_remove_control() {
    let store = TestStore::seeded(&duplicated_cart());
    let mut cart = store.controller();
    cart.load_and_display().unwrap();

    assert!(cart.dispatch(&click("cart-item-0-remove")).unwrap());

    let persisted = store.stored_cart().unwrap();
    assert_eq!(persisted.as_array().unwrap().len(), 1);
    assert_eq!(persisted[0]["Id"], "985PR");
    assert_eq!(cart.page().badge.count(), 1);
}

#[test]
fn test_change_quantity_control() {
    let store = TestStore::seeded(&duplicated_cart());
    let mut cart = store.controller();
    cart.load_and_display().unwrap();

    assert!(cart.dispatch(&change("cart-item-1-quantity", "3")).unwrap());

    let persisted = store.stored_cart().unwrap();
    assert_eq!(persisted[1]["Quantity"], 3);
    assert!(cart.page().summary.text().contains("$65.00"));
}

#[test]
fn test_change_quantity_control_with_garbage() {
    let store = TestStore::seeded(&duplicated_cart());
    let mut cart = store.controller();
    cart.load_and_display().unwrap();

    assert!(cart.dispatch(&change("cart-item-0-quantity", "-3")).unwrap());
    assert_eq!(store.stored_cart().unwrap()[0]["Quantity"], 1);
}

#[test]
fn test_controls_follow_the_latest_render() {
    let store = TestStore::seeded(&duplicated_cart());
    let mut cart = store.controller();
    cart.load_and_display().unwrap();

    // After the tent is removed, the sleeping bag is line 0.
    cart.dispatch(&click("cart-item-0-remove")).unwrap();
    assert_eq!(
        cart.registry()
            .binding(&ControlId::new("cart-item-0-remove"))
            .map(|b| b.item.as_str()),
        Some("985PR")
    );
    assert!(
        cart.registry()
            .binding(&ControlId::new("cart-item-1-remove"))
            .is_none()
    );

    cart.dispatch(&click("cart-item-0-remove")).unwrap();
    assert_eq!(store.stored_cart(), Some(json!([])));
}

#[test]
fn test_unbound_events_are_ignored() {
    let store = TestStore::seeded(&duplicated_cart());
    let mut cart = store.controller();
    cart.load_and_display().unwrap();
    let before = store.stored_cart();

    assert!(!cart.dispatch(&click("checkout-button")).unwrap());
    // Kind mismatch: a click on a quantity input is not a removal.
    assert!(!cart.dispatch(&click("cart-item-0-quantity")).unwrap());
    assert!(!cart.dispatch(&change("cart-item-0-remove", "2")).unwrap());

    assert_eq!(store.stored_cart(), before);
}

#[test]
fn test_events_before_first_render_are_ignored() {
    let store = TestStore::seeded(&duplicated_cart());
    let mut cart = store.controller();

    assert!(!cart.dispatch(&click("cart-item-0-remove")).unwrap());
    assert_eq!(store.stored_cart(), Some(duplicated_cart()));
}

#[test]
fn test_shared_badge_tracks_every_page() {
    let store = Rc::new(MemoryStore::new());
    let badge = CountBadge::new();
    let config = CartConfig::default();

    let mut cart_page = CartController::with_badge(Rc::clone(&store), &config, badge.clone());
    let mut product_page = CartController::with_badge(Rc::clone(&store), &config, badge.clone());

    product_page
        .add(serde_json::from_value(json!({"Id": "880RR", "FinalPrice": 10, "Quantity": 2})).unwrap())
        .unwrap();
    assert_eq!(badge.count(), 2);

    cart_page.load_and_display().unwrap();
    cart_page.dispatch(&change("cart-item-0-quantity", "5")).unwrap();
    assert_eq!(badge.count(), 5);

    // A raw write from elsewhere (duplicates included) still shows merged counts.
    store
        .set(CART_KEY, json!([{"Id": "A"}, {"Id": "A", "Quantity": 4}]).to_string())
        .unwrap();
    assert_eq!(badge.count(), 5);

    // The cart page last rendered the tent, which is gone now.
    cart_page.dispatch(&click("cart-item-0-remove")).unwrap();
    assert_eq!(badge.count(), 5);

    cart_page.dispatch(&click("cart-item-0-remove")).unwrap();
    assert_eq!(badge.count(), 0);
}
