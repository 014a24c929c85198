//! On-disk store backend.
//!
//! The whole store is one JSON object (`{"so-cart": "[...]"}`) whose values are
//! the raw stored strings. The file is re-read on every `get` so another process
//! sharing it sees the latest write, and replaced atomically on every `set`.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError, Subscriber, Subscribers, SubscriptionId};

/// A [`KeyValueStore`] persisted to a single JSON file.
pub struct FileStore {
    path: PathBuf,
    subscribers: Subscribers,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            subscribers: Subscribers::default(),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry. A missing file is an empty store; an unreadable
    /// document is logged and also treated as empty.
    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Store file is not a JSON object of strings, treating as empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    /// Write every entry via a temporary sibling file and a rename.
    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = serde_json::to_string_pretty(entries)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, contents).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.insert(key.to_owned(), value.clone());
        self.save(&entries)?;
        tracing::debug!(path = %self.path.display(), key, "Store written");
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        assert_eq!(store.get("so-cart").unwrap(), None);
    }

    #[test]
    fn test_set_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/storage.json");

        FileStore::new(&path)
            .set("so-cart", "[]".to_string())
            .unwrap();
        FileStore::new(&path)
            .set("theme", "dark".to_string())
            .unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("so-cart").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_garbage_file_is_treated_as_empty_and_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "definitely not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("so-cart").unwrap(), None);

        store.set("so-cart", "[]".to_string()).unwrap();
        assert_eq!(store.get("so-cart").unwrap().as_deref(), Some("[]"));
    }
}
