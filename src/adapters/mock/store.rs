//! In-memory key/value store for testing.
//!
//! Stores entries in memory and lets tests force any operation to fail.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::traits::KeyValueStore;

/// In-memory key/value store for testing.
///
/// # Example
///
/// ```ignore
/// use panel_state::adapters::mock::InMemoryStore;
/// use panel_state::traits::KeyValueStore;
///
/// let store = InMemoryStore::new();
/// store.set_item("theme", "\"dark\"")?;
/// assert_eq!(store.get_item("theme")?, Some("\"dark\"".to_string()));
///
/// store.set_set_should_fail(true);
/// assert!(store.set_item("theme", "\"light\"").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    get_should_fail: Arc<Mutex<bool>>,
    set_should_fail: Arc<Mutex<bool>>,
    remove_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure whether reads should fail.
    pub fn set_get_should_fail(&self, should_fail: bool) {
        *self.get_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether writes should fail.
    pub fn set_set_should_fail(&self, should_fail: bool) {
        *self.set_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether deletes should fail.
    pub fn set_remove_should_fail(&self, should_fail: bool) {
        *self.remove_should_fail.lock().unwrap() = should_fail;
    }

    /// Seed an entry directly, bypassing failure injection.
    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Read an entry directly, bypassing failure injection.
    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        if *self.get_should_fail.lock().unwrap() {
            return Err(StoreError::Unavailable("Mock read failure".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if *self.set_should_fail.lock().unwrap() {
            return Err(StoreError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        self.insert(key, value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        if *self.remove_should_fail.lock().unwrap() {
            return Err(StoreError::Other("Mock remove failure".to_string()));
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
