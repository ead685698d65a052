/// Key-value persistence used by the history and preferences stores
use crate::error::{Error, Result};
use std::collections::HashMap;

/// A string-keyed slot store with last-write-wins semantics
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store, used in tests and when no browser storage is reachable
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            slots: HashMap::new(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// `window.localStorage`, scoped to the extension's browser profile
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| Error::Storage("no window available".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| Error::Storage(format!("localStorage blocked: {:?}", e)))?
            .ok_or_else(|| Error::Storage("localStorage unavailable".to_string()))?;
        Ok(LocalStorage { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read {}: {:?}", key, e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("Failed to write {}: {:?}", key, e)))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| Error::Storage(format!("Failed to remove {}: {:?}", key, e)))
    }
}

/// Opens browser storage, falling back to memory outside a browser
pub fn open_default() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{}; history and preferences will not persist", e);
            Box::new(MemoryStore::new())
        }
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut store = MemoryStore::new();
        store.set("key", "value").unwrap();
        assert_eq!(store.get("key"), Some("value".to_string()));
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = MemoryStore::new();
        store.set("key", "first").unwrap();
        store.set("key", "second").unwrap();
        assert_eq!(store.get("key"), Some("second".to_string()));
    }

    #[test]
    fn test_remove() {
        let mut store = MemoryStore::new();
        store.set("key", "value").unwrap();
        store.remove("key").unwrap();
        store.remove("missing").unwrap();
        assert_eq!(store.get("key"), None);
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("key", "value").unwrap();
        assert_eq!(store.get("key"), Some("value".to_string()));
    }
}
