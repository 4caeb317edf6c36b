//! Associative-array path normalization.
//!
//! Rewrites a concrete path so that every object key covered by a
//! declared map becomes the positional index of that key in the current
//! tree, e.g. "Fields:Field2:Value" -> "Fields[1]:Value" when "Fields" is
//! declared map-like. Runs to a fixpoint because a rewritten prefix may
//! itself fall under another, more deeply nested mapping.
//!
//! Normalization is best-effort and never fails: a key missing from its
//! map object, or a mapping whose base object is absent or not an object,
//! simply leaves the path unchanged at that position.

use crate::model::AssociativeArrayMapping;
use crate::path::{render, tokenize, PathToken};
use crate::tree::{child_at, value_at_tokens};
use serde_json::Value;
use std::collections::HashSet;

/// Rewrite every declared map key in `path` into its positional index.
///
/// Mappings are applied longest base path first so nested maps win over
/// their ancestors; any successful rewrite restarts the scan.
pub fn normalize_associative_array_path(
    path: &str,
    mappings: &[AssociativeArrayMapping],
    tree: &Value,
) -> String {
    normalize_with_skip(path, mappings, tree, &HashSet::new())
}

/// Fixpoint loop shared with base-path self-normalization.
///
/// `skip` holds base paths already being normalized further up the
/// recursion, which both implements "normalize a base path against the
/// *other* mappings" and bounds the recursion.
fn normalize_with_skip(
    path: &str,
    mappings: &[AssociativeArrayMapping],
    tree: &Value,
    skip: &HashSet<String>,
) -> String {
    let mut sorted: Vec<&AssociativeArrayMapping> = mappings
        .iter()
        .filter(|m| !skip.contains(m.base_path.as_str()))
        .collect();
    sorted.sort_by(|a, b| b.base_path.len().cmp(&a.base_path.len()));

    let mut current = path.to_string();
    loop {
        let mut changed = false;
        for &mapping in &sorted {
            let next = if has_wildcard(&mapping.base_path) {
                apply_wildcard_base(&current, mapping, tree)
            } else {
                apply_literal_base(&current, mapping, mappings, tree, skip)
            };
            if let Some(next) = next {
                if next != current {
                    current = next;
                    changed = true;
                    break;
                }
            }
        }
        if !changed {
            return current;
        }
    }
}

fn has_wildcard(path: &str) -> bool {
    tokenize(path)
        .iter()
        .any(|t| matches!(t, PathToken::Wildcard))
}

/// Apply a mapping whose base path contains no wildcard.
///
/// The path is matched against the *normalized* base path (an outer map
/// may already have rewritten this mapping's own prefix), while the map
/// object itself is looked up by the declared base path. The segment
/// directly after the prefix is the map key; any "[N]" trailing it is a
/// separate token and survives the rewrite, so a map value that is itself
/// an array yields "[mapIndex][arrayIndex]".
fn apply_literal_base(
    path: &str,
    mapping: &AssociativeArrayMapping,
    mappings: &[AssociativeArrayMapping],
    tree: &Value,
    skip: &HashSet<String>,
) -> Option<String> {
    let mut inner_skip = skip.clone();
    inner_skip.insert(mapping.base_path.clone());
    let normalized_base = normalize_with_skip(&mapping.base_path, mappings, tree, &inner_skip);

    let base_tokens = tokenize(&normalized_base);
    let path_tokens = tokenize(path);
    if path_tokens.len() <= base_tokens.len() || path_tokens[..base_tokens.len()] != base_tokens[..]
    {
        return None;
    }

    let key = match &path_tokens[base_tokens.len()] {
        PathToken::Segment(key) if !key.is_empty() => key.clone(),
        _ => return None,
    };

    let map = value_at_tokens(tree, &tokenize(&mapping.base_path))?.as_object()?;
    let index = map.keys().position(|k| *k == key)?;

    let mut rewritten = path_tokens;
    rewritten[base_tokens.len()] = PathToken::Index(index);
    Some(render(&rewritten))
}

/// Apply a mapping whose base path contains "[*]".
///
/// Walks the base pattern and the path together with a cursor into the
/// tree, converting any still-literal key consumed at a wildcard position
/// left to right (later wildcards need the earlier ones resolved to find
/// the right nested object), then converts the key directly after the
/// base. The rewrite is atomic: if the trailing key cannot be resolved,
/// nothing changes.
fn apply_wildcard_base(
    path: &str,
    mapping: &AssociativeArrayMapping,
    tree: &Value,
) -> Option<String> {
    let base_tokens = tokenize(&mapping.base_path);
    let path_tokens = tokenize(path);
    if path_tokens.len() <= base_tokens.len() {
        return None;
    }

    let mut rewritten: Vec<PathToken> = Vec::with_capacity(path_tokens.len());
    let mut cursor = tree;
    for (base_token, path_token) in base_tokens.iter().zip(&path_tokens) {
        match (base_token, path_token) {
            (PathToken::Segment(b), PathToken::Segment(p)) if b == p => {
                cursor = cursor.as_object()?.get(p)?;
                rewritten.push(path_token.clone());
            }
            (PathToken::Index(b), PathToken::Index(p)) if b == p => {
                cursor = child_at(cursor, *p)?;
                rewritten.push(path_token.clone());
            }
            (PathToken::Wildcard, PathToken::Segment(key)) => {
                let map = cursor.as_object()?;
                let index = map.keys().position(|k| k == key)?;
                cursor = map.get(key)?;
                rewritten.push(PathToken::Index(index));
            }
            (PathToken::Wildcard, PathToken::Index(p)) => {
                cursor = child_at(cursor, *p)?;
                rewritten.push(PathToken::Index(*p));
            }
            _ => return None,
        }
    }

    match &path_tokens[base_tokens.len()] {
        PathToken::Segment(key) if !key.is_empty() => {
            let map = cursor.as_object()?;
            let index = map.keys().position(|k| k == key)?;
            rewritten.push(PathToken::Index(index));
        }
        _ => return None,
    }
    rewritten.extend(path_tokens[base_tokens.len() + 1..].iter().cloned());

    let result = render(&rewritten);
    if result == path {
        None
    } else {
        Some(result)
    }
}
