//! A value mirrored into a durable key/value store.
//!
//! The store is read once, when the value is created. Writes and deletes are
//! best-effort: a failing store is logged and the in-memory value still
//! advances, so a broken store can never block the UI.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::traits::KeyValueStore;

/// A value synchronized with one entry of a [`KeyValueStore`].
///
/// Two values created over the same key do not observe each other's writes;
/// each sees what was stored at its own construction time.
pub struct PersistentValue<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    initial: T,
    value: T,
}

impl<T> PersistentValue<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Load the value stored under `key`, or fall back to `initial`.
    ///
    /// A missing entry, a failing store, or an entry that is not valid JSON
    /// for `T` all yield `initial`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, initial: T) -> Self {
        let key = key.into();
        let value = read_entry(store.as_ref(), &key).unwrap_or_else(|| initial.clone());
        Self {
            store,
            key,
            initial,
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Replace the value and write it to the store.
    pub fn set_value(&mut self, value: T) {
        self.value = value;
        self.write();
    }

    /// Derive the new value from the previous one and write it to the store.
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value);
        self.set_value(next);
    }

    /// Delete the stored entry and return to the initial value.
    pub fn remove_value(&mut self) {
        if let Err(err) = self.store.remove_item(&self.key) {
            tracing::warn!(key = %self.key, error = %err, "Failed to remove persisted value");
        }
        self.value = self.initial.clone();
    }

    fn write(&self) {
        let json = match serde_json::to_string(&self.value) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "Failed to serialize persisted value");
                return;
            }
        };
        if let Err(err) = self.store.set_item(&self.key, &json) {
            tracing::warn!(key = %self.key, error = %err, "Failed to write persisted value");
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PersistentValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentValue")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

fn read_entry<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "Failed to read persisted value");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "Malformed persisted value, using initial value");
            None
        }
    }
}
