//! Integration tests for the Sleep Outside cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sleep-outside-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_cycle` - load, remove and quantity changes against an on-disk store
//! - `cart_events` - UI events routed through the rendered controls
//!
//! Every test gets its own temporary store file from [`TestStore`].

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use sleep_outside_storefront::cart::CartController;
use sleep_outside_storefront::config::CartConfig;
use sleep_outside_storefront::storage::{FileStore, KeyValueStore};
use tempfile::TempDir;

/// Storage key used by the fixtures.
pub const CART_KEY: &str = sleep_outside_storefront::cart::CART_KEY;

/// A store file in a temporary directory, removed on drop.
pub struct TestStore {
    _dir: TempDir,
    path: PathBuf,
}

impl TestStore {
    /// An empty store.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("so-storage.json");
        Self { _dir: dir, path }
    }

    /// A store whose cart key holds `cart`, serialized as the browser would.
    ///
    /// # Panics
    ///
    /// Panics if the seed cannot be written.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn seeded(cart: &Value) -> Self {
        let store = Self::empty();
        store
            .open()
            .set(CART_KEY, cart.to_string())
            .expect("seed store");
        store
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A fresh handle on the store file, like a second page opening it.
    #[must_use]
    pub fn open(&self) -> FileStore {
        FileStore::new(self.path.clone())
    }

    /// A cart controller over a fresh handle.
    #[must_use]
    pub fn controller(&self) -> CartController<FileStore> {
        CartController::new(self.open(), &CartConfig::default())
    }

    /// The cart value currently on disk.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be read or the cart is not JSON.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn stored_cart(&self) -> Option<Value> {
        self.open()
            .get(CART_KEY)
            .expect("read store")
            .map(|raw| serde_json::from_str(&raw).expect("stored cart is JSON"))
    }
}

/// A catalog product as the product page stores it.
#[must_use]
pub fn catalog_item(id: &str, name: &str, price: f64, quantity: u32) -> Value {
    json!({
        "Id": id,
        "Name": name,
        "NameWithoutBrand": name,
        "FinalPrice": price,
        "SuggestedRetailPrice": price,
        "Quantity": quantity,
        "Images": {
            "PrimaryMedium": format!("/images/tents/{}-320.jpg", id.to_lowercase()),
            "PrimaryLarge": format!("/images/tents/{}-500.jpg", id.to_lowercase())
        },
        "Colors": [{"ColorCode": "01", "ColorName": "Pale Pumpkin/Terracotta"}],
        "Brand": {"Id": "1308", "Name": "Marmot"}
    })
}

/// Two entries for the same tent (2 + 3) and one sleeping bag.
#[must_use]
pub fn duplicated_cart() -> Value {
    json!([
        catalog_item("880RR", "Marmot Ajax Tent - 3-Person, 3-Season", 10.0, 2),
        catalog_item("880RR", "Marmot Ajax Tent - 3-Person, 3-Season", 10.0, 3),
        catalog_item("985PR", "The North Face Alpine Guide 0 Sleeping Bag", 5.0, 1)
    ])
}
