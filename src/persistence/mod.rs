//! Key-value persistence
//!
//! Everything the game persists is a JSON string stored under a single key:
//! - LocalStorage on web
//! - One file per key in the platform data directory on native
//! - An in-memory map for tests and headless runs

use std::collections::HashMap;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Minimal string key-value store
///
/// Reads never fail: a missing or unreadable key is `None`. Writes report
/// success so callers can log a failed save.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> bool;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> bool {
        self.items.insert(key.to_string(), value.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_item("k"), None);
        assert!(store.set_item("k", "[1]"));
        assert_eq!(store.get_item("k").as_deref(), Some("[1]"));
        assert!(store.set_item("k", "[2]"));
        assert_eq!(store.get_item("k").as_deref(), Some("[2]"));
    }
}
