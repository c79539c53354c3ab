//! Shallow merge for modal payload updates.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Merge a partial update into `self`, one level deep.
///
/// Keys present in `patch` overwrite the same keys in `self`; every other
/// key is kept. Nested objects are replaced, not merged.
pub trait ShallowMerge {
    fn merge(&mut self, patch: Self);
}

impl ShallowMerge for Value {
    /// Object into object merges keys. Anything else is replaced by `patch`.
    fn merge(&mut self, patch: Self) {
        match (self, patch) {
            (Value::Object(target), Value::Object(patch)) => target.merge(patch),
            (target, patch) => *target = patch,
        }
    }
}

impl ShallowMerge for Map<String, Value> {
    fn merge(&mut self, patch: Self) {
        for (key, value) in patch {
            self.insert(key, value);
        }
    }
}

impl<V> ShallowMerge for IndexMap<String, V> {
    fn merge(&mut self, patch: Self) {
        self.extend(patch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_merge_keeps_other_keys() {
        let mut data = json!({"id": 1, "name": "Apollo", "owner": {"id": 7}});
        data.merge(json!({"name": "Artemis", "owner": {"name": "Kim"}}));
        assert_eq!(data, json!({"id": 1, "name": "Artemis", "owner": {"name": "Kim"}}));
    }

    #[test]
    fn test_non_object_is_replaced() {
        let mut data = json!([1, 2]);
        data.merge(json!({"id": 3}));
        assert_eq!(data, json!({"id": 3}));

        let mut data = json!({"id": 3});
        data.merge(json!("x"));
        assert_eq!(data, json!("x"));
    }

    #[test]
    fn test_index_map_merge() {
        let mut data: IndexMap<String, i32> = [("a".to_string(), 1), ("b".to_string(), 2)].into_iter().collect();
        data.merge([("b".to_string(), 20), ("c".to_string(), 3)].into_iter().collect());
        let entries: Vec<_> = data.into_iter().collect();
        assert_eq!(
            entries,
            vec![("a".to_string(), 1), ("b".to_string(), 20), ("c".to_string(), 3)]
        );
    }
}
