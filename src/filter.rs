//! Key-based redaction of metadata trees.
//!
//! Every mapping key is checked against a blocklist of substrings. A key
//! containing any term has its value replaced by [`FILTERED`], whatever that
//! value was. Nested mappings are walked recursively. Sequences are left as
//! they are, since their elements have no keys of their own.
//!
//! # Examples
//!
//! ```
//! use error_relay::filter::apply_filters;
//! use serde_json::json;
//!
//! let tree = json!({
//!     "request": { "params": { "password": "hunter2", "user": "ana" } },
//!     "Cookie": { "session": "abc" }
//! });
//! let tree = tree.as_object().cloned().unwrap();
//!
//! let clean = apply_filters(tree, &["password", "Cookie"]);
//! assert_eq!(clean["request"]["params"]["password"], "[FILTERED]");
//! assert_eq!(clean["request"]["params"]["user"], "ana");
//! assert_eq!(clean["Cookie"], "[FILTERED]");
//! ```

use crate::types::MetaData;
use serde_json::Value;

/// Marker that replaces redacted values.
pub const FILTERED: &str = "[FILTERED]";

/// Redacts every key that contains one of `terms` (case-sensitive).
///
/// With no terms the tree is returned untouched.
pub fn apply_filters<S: AsRef<str>>(tree: MetaData, terms: &[S]) -> MetaData {
    if terms.is_empty() {
        return tree;
    }

    tree.into_iter()
        .map(|(key, value)| {
            let value = if is_filtered_key(&key, terms) {
                Value::String(FILTERED.to_string())
            } else {
                filter_value(value, terms)
            };
            (key, value)
        })
        .collect()
}

/// Returns `true` when `key` contains any of `terms`.
#[inline]
pub fn is_filtered_key<S: AsRef<str>>(key: &str, terms: &[S]) -> bool {
    terms.iter().any(|term| key.contains(term.as_ref()))
}

#[inline]
fn filter_value<S: AsRef<str>>(value: Value, terms: &[S]) -> Value {
    match value {
        Value::Object(map) => Value::Object(apply_filters(map, terms)),
        other => other,
    }
}
