//! Persistent key-value storage.
//!
//! The cart lives under a single key as one serialized JSON blob, the way a
//! browser keeps it in local storage. Every operation reads and rewrites the
//! whole value; there are no partial updates and no locking, so the last writer
//! wins.
//!
//! # Backends
//!
//! - [`MemoryStore`] - in-process map, used for tests and embedding
//! - [`FileStore`] - one JSON document on disk mapping keys to stored strings
//!
//! Both implement [`KeyValueStore`]. [`Storage`] layers typed JSON access on top.

mod file;
mod memory;

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialized to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Handle returned by [`KeyValueStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked with the raw value just written under a watched key.
pub type Subscriber = Rc<dyn Fn(&str)>;

/// A string-valued key-value store with change notification.
///
/// Methods take `&self`; backends use interior mutability so a store can be
/// shared between the cart page, the product page and the item-count badge.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`, then notify its subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Call `subscriber` after every successful `set` of `key`.
    fn subscribe(&self, key: &str, subscriber: Subscriber) -> SubscriptionId;

    /// Stop notifying a subscriber. Returns `false` if it was already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn subscribe(&self, key: &str, subscriber: Subscriber) -> SubscriptionId {
        (**self).subscribe(key, subscriber)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        (**self).unsubscribe(id)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn subscribe(&self, key: &str, subscriber: Subscriber) -> SubscriptionId {
        (**self).subscribe(key, subscriber)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        (**self).unsubscribe(id)
    }
}

/// Subscriber bookkeeping shared by the store backends.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(SubscriptionId, String, Subscriber)>>,
}

impl Subscribers {
    pub(crate) fn add(&self, key: &str, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries
            .borrow_mut()
            .push((id, key.to_owned(), subscriber));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _, _)| *entry_id != id);
        entries.len() != before
    }

    /// Call every subscriber of `key`.
    ///
    /// The matching callbacks are collected before any runs, so a subscriber may
    /// subscribe, unsubscribe or read the store without a borrow conflict.
    pub(crate) fn notify(&self, key: &str, value: &str) {
        let matching: Vec<Subscriber> = self
            .entries
            .borrow()
            .iter()
            .filter(|(_, entry_key, _)| entry_key == key)
            .map(|(_, _, subscriber)| Rc::clone(subscriber))
            .collect();
        for subscriber in matching {
            subscriber(value);
        }
    }
}

/// Typed JSON access over a [`KeyValueStore`].
pub struct Storage<S> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    /// Wrap a store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Read and parse the JSON value under `key`.
    ///
    /// A missing key and a value that does not parse as `T` both yield `None`;
    /// the latter is logged and otherwise treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend itself cannot be read.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring unparseable stored value");
                Ok(None)
            }
        }
    }

    /// Serialize `value` to JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, raw)
    }
}
