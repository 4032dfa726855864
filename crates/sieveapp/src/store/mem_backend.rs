use super::KeyValueStore;
use crate::error::{Result, SieveError};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory key-value store.
///
/// Uses `RefCell` for interior mutability since the engine is single-threaded.
/// This lets `KeyValueStore` keep `&self` receivers without a lock.
#[derive(Debug, Default)]
pub struct MemStore {
    items: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
    simulate_read_error: Cell<bool>,
    simulate_write_error: Cell<bool>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `value` under `key`.
    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Enable read error simulation for testing error handling.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful `set_item` calls.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Raw stored value, bypassing error simulation.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        if self.simulate_read_error.get() {
            return Err(SieveError::Store("Simulated read error".to_string()));
        }
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(SieveError::Store("Simulated write error".to_string()));
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(SieveError::Store("Simulated write error".to_string()));
        }
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let store = MemStore::new();
        store.set_item("filter-state", "{}").unwrap();
        assert_eq!(store.get_item("filter-state").unwrap(), Some("{}".to_string()));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn missing_key_is_none() {
        let store = MemStore::new();
        assert_eq!(store.get_item("nope").unwrap(), None);
    }

    #[test]
    fn remove_is_idempotent() {
        let store = MemStore::with_item("k", "v");
        store.remove_item("k").unwrap();
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }

    #[test]
    fn simulated_errors() {
        let store = MemStore::with_item("k", "v");

        store.set_simulate_read_error(true);
        assert!(matches!(store.get_item("k"), Err(SieveError::Store(_))));

        store.set_simulate_write_error(true);
        assert!(store.set_item("k", "w").is_err());
        assert_eq!(store.peek("k"), Some("v".to_string()));
        assert_eq!(store.write_count(), 0);
    }
}
