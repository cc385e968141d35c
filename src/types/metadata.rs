//! The metadata tree and its merge rules.

use serde_json::{Map, Value};

/// A JSON-like tree of context tabs (`request`, `session`, `environment`, ...).
pub type MetaData = Map<String, Value>;

/// Deep-merges `incoming` into `base`.
///
/// When both sides hold a mapping under the same key the mappings are merged
/// recursively, when both hold sequences they are concatenated. Any other
/// collision, including two scalars, is won by `incoming`.
pub fn deep_merge(base: &mut MetaData, incoming: MetaData) {
    for (key, value) in incoming {
        match base.get_mut(&key) {
            Some(slot) => merge_value(slot, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

fn merge_value(slot: &mut Value, incoming: Value) {
    match (slot, incoming) {
        (Value::Object(existing), Value::Object(more)) => deep_merge(existing, more),
        (Value::Array(existing), Value::Array(more)) => existing.extend(more),
        (slot, incoming) => *slot = incoming,
    }
}

/// Converts a JSON value into a tree when it is a mapping.
///
/// Returns `None` for scalars, sequences and `null`.
#[inline]
pub fn into_tree(value: Value) -> Option<MetaData> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
