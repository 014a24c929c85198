//! In-process store backend.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{KeyValueStore, StorageError, Subscriber, Subscribers, SubscriptionId};

/// A [`KeyValueStore`] held entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    subscribers: Subscribers,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.borrow_mut().insert(key.to_owned(), value.clone());
        self.subscribers.notify(key, &value);
        Ok(())
    }

    fn subscribe(&self, key: &str, subscriber: Subscriber) -> SubscriptionId {
        self.subscribers.add(key, subscriber)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }
}
