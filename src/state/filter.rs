//! Filter criteria for list pages.
//!
//! Values equal to `null`, `""` or `"all"` mean "not filtering on this key"
//! and are left out of the query projection.

use indexmap::IndexMap;
use serde_json::Value;

/// Ordered filter criteria.
pub type FilterValues = IndexMap<String, Value>;

/// Literal string that selects every option of a dropdown filter.
const ALL: &str = "all";

/// Whether `value` means "no filter".
pub fn is_sentinel(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() || s == ALL,
        _ => false,
    }
}

/// Filter criteria with a snapshot of their initial values.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSet {
    initial: FilterValues,
    values: FilterValues,
}

impl FilterSet {
    pub fn new(initial: FilterValues) -> Self {
        Self {
            values: initial.clone(),
            initial,
        }
    }

    /// Build from `(key, value)` pairs, keeping their order.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::new(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn values(&self) -> &FilterValues {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Replace one entry, keeping all others (and the entry's position).
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Shallow-merge several entries.
    pub fn set_multiple<I, K>(&mut self, patch: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in patch {
            self.values.insert(key.into(), value);
        }
    }

    /// Restore the initial snapshot.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
    }

    /// Restore one key to its initial value, or drop it if it had none.
    pub fn reset_one(&mut self, key: &str) {
        match self.initial.get(key) {
            Some(initial) => {
                self.values.insert(key.to_string(), initial.clone());
            }
            None => {
                self.values.shift_remove(key);
            }
        }
    }

    /// Entries that actually filter something, in insertion order.
    pub fn to_query_params(&self) -> FilterValues {
        self.values
            .iter()
            .filter(|(_, v)| !is_sentinel(v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Query params as string pairs for a URL query.
    ///
    /// Strings are passed verbatim; other JSON values are rendered compactly.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter(|(_, v)| !is_sentinel(v))
            .map(|(k, v)| {
                let rendered = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect()
    }

    /// True when no entry filters anything.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(is_sentinel)
    }

    /// Number of entries that filter something.
    pub fn active_count(&self) -> usize {
        self.values.values().filter(|v| !is_sentinel(v)).count()
    }
}
