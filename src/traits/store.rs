//! Durable key/value store trait abstraction.
//!
//! Models the browser-style storage a [`crate::state::PersistentValue`]
//! mirrors its value into: string keys, string values, synchronous access.

use std::sync::Arc;

use crate::error::StoreError;

/// Trait for durable string key/value storage.
///
/// Every operation may fail. Callers inside this crate treat failures as
/// best-effort: they are logged and otherwise ignored.
///
/// # Example
///
/// ```ignore
/// use panel_state::traits::KeyValueStore;
///
/// fn remember_theme<S: KeyValueStore>(store: &S, theme: &str) -> Result<(), StoreError> {
///     let json = serde_json::to_string(theme)?;
///     store.set_item("theme", &json)
/// }
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Read the entry stored under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(value))` if an entry exists
    /// - `Ok(None)` if nothing is stored under `key`
    /// - `Err(error)` if the store could not be read
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous entry.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the entry under `key`. Deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}
