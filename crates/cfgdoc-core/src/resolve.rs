//! Template resolution and documentation merging.
//!
//! Given a concrete path the user is viewing, find the template entry
//! that applies to it and combine it with any directly authored entry.
//! Every lookup degrades to `None`; there is no error case.

use crate::model::{AssociativeArrayMapping, DocStore, PropertyDoc};
use crate::normalize::normalize_associative_array_path;
use crate::path::{matches_template_path, normalize_to_template_path, wildcard_count};
use serde_json::Value;

/// The canonical template path for a concrete path: associative-array
/// normalization (when a tree is supplied) followed by index wildcarding.
pub fn get_template_path_for_concrete(
    path: &str,
    mappings: &[AssociativeArrayMapping],
    tree: Option<&Value>,
) -> String {
    let normalized = match tree {
        Some(tree) => normalize_associative_array_path(path, mappings, tree),
        None => path.to_string(),
    };
    normalize_to_template_path(&normalized)
}

/// Find the template entry applying to a concrete path.
///
/// Tries the direct store lookup under the canonical template path first,
/// then falls back to scanning template entries whose pattern matches the
/// path. Never returns a non-template entry.
///
/// When several patterns match, the most specific one wins: fewest
/// wildcards, then the longer key, then the lexicographically smaller
/// key. This replaces the unspecified "store iteration order" tie-break.
pub fn find_template_for_path<'a>(
    path: &str,
    store: &'a DocStore,
    mappings: &[AssociativeArrayMapping],
    tree: Option<&Value>,
) -> Option<&'a PropertyDoc> {
    let template_path = get_template_path_for_concrete(path, mappings, tree);
    if template_path != path {
        if let Some(doc) = store.get(&template_path) {
            if doc.is_template {
                return Some(doc);
            }
        }
    }

    store
        .iter()
        .filter(|(key, doc)| doc.is_template && matches_template_path(path, key))
        .min_by_key(|(key, _)| {
            (
                wildcard_count(key),
                std::cmp::Reverse(key.len()),
                (*key).clone(),
            )
        })
        .map(|(_, doc)| doc)
}

/// Find documentation for a path, preferring a directly stored entry.
///
/// A literal hit under `path` short-circuits template search entirely;
/// use this where inheritance must not apply once a direct entry exists
/// (uniqueness and authoring checks). Use [`find_template_for_path`] when
/// inherited documentation is wanted regardless.
pub fn find_documentation_for_path<'a>(
    path: &str,
    store: &'a DocStore,
    mappings: &[AssociativeArrayMapping],
    tree: Option<&Value>,
) -> Option<&'a PropertyDoc> {
    if let Some(doc) = store.get(path) {
        return Some(doc);
    }
    find_template_for_path(path, store, mappings, tree)
}

/// The effective documentation for a path: the direct entry with blank
/// spots filled from the matching template.
pub fn find_and_merge_documentation(
    path: &str,
    store: &DocStore,
    mappings: &[AssociativeArrayMapping],
    tree: Option<&Value>,
) -> Option<PropertyDoc> {
    let direct = store.get(path);
    let template = find_template_for_path(path, store, mappings, tree);

    match (direct, template) {
        (None, None) => None,
        (Some(direct), None) => Some(direct.clone()),
        (None, Some(template)) => Some(template.clone()),
        (Some(direct), Some(template)) => Some(merge_documentation(direct, template)),
    }
}

/// Field-level merge of a direct entry and a template entry.
///
/// Tags are adopted wholesale from the template only when the direct
/// entry has none. A template field value is adopted only where the
/// direct value is absent or blank, and blank template values are never
/// added. Authored content is never overwritten.
pub fn merge_documentation(direct: &PropertyDoc, template: &PropertyDoc) -> PropertyDoc {
    let mut merged = direct.clone();

    if merged.tags.is_empty() && !template.tags.is_empty() {
        merged.tags = template.tags.clone();
    }

    for (name, value) in &template.fields {
        if value.trim().is_empty() {
            continue;
        }
        let direct_is_blank = merged
            .fields
            .get(name)
            .map_or(true, |v| v.trim().is_empty());
        if direct_is_blank {
            merged.fields.insert(name.clone(), value.clone());
        }
    }

    merged
}
