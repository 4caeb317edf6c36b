//! Wildcard base-path promotion.
//!
//! When the user declares a new object map-like, the stored base path
//! must compose with every mapping already declared above it: each key
//! sitting at an ancestor-map position is replaced with "[*]", so the new
//! mapping covers all sibling keys, not just the one the user happened to
//! be editing.

use crate::model::AssociativeArrayMapping;
use crate::path::{render, tokenize, PathToken};
use crate::tree::child_at;
use serde_json::Value;

/// Compute the canonical (possibly wildcarded) base path to store for a
/// new mapping declared at `path`.
///
/// Existing mappings are applied shortest base path first: outer
/// wildcards have to be in place before an inner mapping's pattern can
/// match. Declaring a map at "AppSettings:Fields:Field1:Contents:Map"
/// while "AppSettings:Fields" is already registered yields
/// "AppSettings:Fields[*]:Contents:Map".
pub fn convert_to_wildcard_base_path(
    path: &str,
    mappings: &[AssociativeArrayMapping],
    tree: &Value,
) -> String {
    let mut sorted: Vec<&AssociativeArrayMapping> = mappings.iter().collect();
    sorted.sort_by_key(|m| m.base_path.len());

    let mut tokens = tokenize(path);
    loop {
        let mut changed = false;
        for mapping in &sorted {
            if let Some(next) = promote_against(&tokens, &mapping.base_path, tree) {
                tokens = next;
                changed = true;
                break;
            }
        }
        if !changed {
            return render(&tokens);
        }
    }
}

/// Replace the key following `base_path` in `tokens` with a wildcard, if
/// the base is a structural prefix and the key actually exists in the
/// corresponding map object.
///
/// Wildcard positions in the base may already be promoted (or hold a
/// concrete index) in the current result. Where the prefix cannot be
/// pinned to one concrete object, the key counts as existing if any
/// instance of the prefix contains it.
fn promote_against(
    tokens: &[PathToken],
    base_path: &str,
    tree: &Value,
) -> Option<Vec<PathToken>> {
    let base_tokens = tokenize(base_path);
    if tokens.len() <= base_tokens.len() {
        return None;
    }

    for (base_token, token) in base_tokens.iter().zip(tokens) {
        let matches = match (base_token, token) {
            (PathToken::Segment(b), PathToken::Segment(p)) => b == p,
            (PathToken::Index(b), PathToken::Index(p)) => b == p,
            (PathToken::Wildcard, PathToken::Wildcard) => true,
            (PathToken::Wildcard, PathToken::Index(_)) => true,
            _ => false,
        };
        if !matches {
            return None;
        }
    }

    let key = match &tokens[base_tokens.len()] {
        PathToken::Segment(key) if !key.is_empty() => key,
        _ => return None,
    };

    let prefix = &tokens[..base_tokens.len()];
    let key_exists = prefix_instances(tree, prefix)
        .iter()
        .any(|v| v.as_object().is_some_and(|map| map.contains_key(key)));
    if !key_exists {
        return None;
    }

    let mut promoted = tokens.to_vec();
    promoted[base_tokens.len()] = PathToken::Wildcard;
    Some(promoted)
}

/// All concrete values a (possibly wildcarded) token prefix resolves to.
fn prefix_instances<'a>(tree: &'a Value, tokens: &[PathToken]) -> Vec<&'a Value> {
    let mut current = vec![tree];
    for token in tokens {
        let mut next = Vec::new();
        for value in current {
            match token {
                PathToken::Segment(key) => {
                    if let Some(child) = value.as_object().and_then(|m| m.get(key)) {
                        next.push(child);
                    }
                }
                PathToken::Index(i) => {
                    if let Some(child) = child_at(value, *i) {
                        next.push(child);
                    }
                }
                PathToken::Wildcard => match value {
                    Value::Array(items) => next.extend(items.iter()),
                    Value::Object(map) => next.extend(map.values()),
                    _ => {}
                },
            }
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssociativeArrayMapping;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn mappings(paths: &[&str]) -> Vec<AssociativeArrayMapping> {
        paths
            .iter()
            .map(|p| AssociativeArrayMapping::new(p))
            .collect()
    }

    #[test]
    fn test_no_existing_mappings_is_identity() {
        let tree = json!({"A": {"B": 1}});
        assert_eq!(convert_to_wildcard_base_path("A:B", &[], &tree), "A:B");
    }

    #[test]
    fn test_promotion_under_registered_ancestor() {
        let tree = json!({
            "AppSettings": {
                "Fields": {
                    "Field1": {"Contents": {"Map": {}}},
                    "Field2": {"Contents": {"Map": {}}}
                }
            }
        });
        let existing = mappings(&["AppSettings:Fields"]);

        assert_eq!(
            convert_to_wildcard_base_path(
                "AppSettings:Fields:Field1:Contents:Map",
                &existing,
                &tree
            ),
            "AppSettings:Fields[*]:Contents:Map"
        );
    }

    #[test]
    fn test_promotion_cascades_outer_to_inner() {
        let tree = json!({
            "Fields": {
                "F1": {"Map": {"AAA": {"Deep": {}}}}
            }
        });
        let existing = mappings(&["Fields", "Fields[*]:Map"]);

        // Outer key F1 promotes first, which lets the inner wildcarded
        // mapping recognize its own prefix and promote AAA.
        assert_eq!(
            convert_to_wildcard_base_path("Fields:F1:Map:AAA:Deep", &existing, &tree),
            "Fields[*]:Map[*]:Deep"
        );
    }

    #[test]
    fn test_key_not_in_map_object_is_not_promoted() {
        let tree = json!({
            "Fields": {"F1": {}}
        });
        let existing = mappings(&["Fields"]);

        // "Ghost" is not a key of the Fields object, so it stays literal.
        assert_eq!(
            convert_to_wildcard_base_path("Fields:Ghost:Sub", &existing, &tree),
            "Fields:Ghost:Sub"
        );
    }

    #[test]
    fn test_existence_check_across_wildcard_instances() {
        let tree = json!({
            "Fields": {
                "F1": {"Map": {}},
                "F2": {"Other": {}}
            }
        });
        let existing = mappings(&["Fields"]);

        // "Map" exists under F1 but not under F2; any instance suffices.
        assert_eq!(
            convert_to_wildcard_base_path("Fields:F1:Map", &existing, &tree),
            "Fields[*]:Map"
        );
    }

    #[test]
    fn test_index_position_is_not_promoted() {
        let tree = json!({
            "Fields": {"F1": [1, 2]}
        });
        let existing = mappings(&["Fields"]);

        // The token after the base is an index, not a key.
        assert_eq!(
            convert_to_wildcard_base_path("Fields[0][1]", &existing, &tree),
            "Fields[0][1]"
        );
    }
}
