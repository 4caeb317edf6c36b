//! Soft-fail access into the JSON configuration tree.
//!
//! Every lookup returns `Option` rather than an error: a missing key, an
//! index into a non-array, or any other shape mismatch is a normal "no
//! value" outcome that callers chain through cheaply.

use crate::path::{tokenize, PathToken};
use serde_json::Value;

/// Walk the tree along a concrete path.
///
/// Segments index objects by key, "[N]" indexes arrays by position.
/// Returns `None` if any intermediate value is missing or has the wrong
/// shape, or if the path contains a wildcard.
pub fn get_value_by_path<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = tree;
    for token in tokenize(path) {
        current = match token {
            PathToken::Segment(key) => current.as_object()?.get(&key)?,
            PathToken::Index(i) => current.as_array()?.get(i)?,
            PathToken::Wildcard => return None,
        };
    }
    Some(current)
}

/// Walk the tree along an already-tokenized path where "[N]" may also
/// address the N-th key of an object.
///
/// Normalized paths use positional indices for map-declared objects, so
/// this variant accepts both arrays and objects at index tokens. Object
/// key order is insertion order (`serde_json` with `preserve_order`).
pub fn value_at_tokens<'a>(tree: &'a Value, tokens: &[PathToken]) -> Option<&'a Value> {
    let mut current = tree;
    for token in tokens {
        current = match token {
            PathToken::Segment(key) => current.as_object()?.get(key)?,
            PathToken::Index(i) => child_at(current, *i)?,
            PathToken::Wildcard => return None,
        };
    }
    Some(current)
}

/// Positional child of a value: array element or N-th object value.
pub fn child_at(value: &Value, index: usize) -> Option<&Value> {
    match value {
        Value::Array(items) => items.get(index),
        Value::Object(map) => map.values().nth(index),
        _ => None,
    }
}
