//! Engine-side support for the export renderers.
//!
//! The HTML/Markdown exporters iterate every documented location in the
//! tree; this module walks the configuration and produces, per concrete
//! path, the effective (merged) documentation. Textual formatting is the
//! renderer's business and stays out of this crate.

use crate::model::{AssociativeArrayMapping, DocStore, PropertyDoc};
use crate::path::{render, tokenize, PathToken};
use crate::resolve::find_and_merge_documentation;
use crate::tree::child_at;
use serde_json::Value;

/// A concrete path together with its effective documentation.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentedPath {
    pub path: String,
    pub doc: PropertyDoc,
}

/// Walk the tree depth-first and collect the effective documentation for
/// every concrete path that has any, in tree order.
pub fn collect_documented_paths(
    tree: &Value,
    store: &DocStore,
    mappings: &[AssociativeArrayMapping],
) -> Vec<DocumentedPath> {
    let mut out = Vec::new();
    collect_inner(tree, tree, "", store, mappings, &mut out);
    out
}

fn collect_inner(
    root: &Value,
    value: &Value,
    path: &str,
    store: &DocStore,
    mappings: &[AssociativeArrayMapping],
    out: &mut Vec<DocumentedPath>,
) {
    if !path.is_empty() {
        if let Some(doc) = find_and_merge_documentation(path, store, mappings, Some(root)) {
            out.push(DocumentedPath {
                path: path.to_string(),
                doc,
            });
        }
    }

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}:{key}")
                };
                collect_inner(root, child, &child_path, store, mappings, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                let child_path = format!("{path}[{i}]");
                collect_inner(root, child, &child_path, store, mappings, out);
            }
        }
        _ => {}
    }
}

/// Expand a template path to every concrete path it covers in the tree.
///
/// Each "[*]" fans out over the children present at that position: array
/// elements, or the keys of a map-declared object by position. Paths
/// whose literal tokens do not resolve produce nothing.
pub fn expand_template_path(tree: &Value, template_path: &str) -> Vec<String> {
    let tokens = tokenize(template_path);
    let mut acc = Vec::new();
    let mut out = Vec::new();
    expand_inner(tree, &tokens, &mut acc, &mut out);
    out
}

fn expand_inner(
    value: &Value,
    rest: &[PathToken],
    acc: &mut Vec<PathToken>,
    out: &mut Vec<String>,
) {
    let Some((token, tail)) = rest.split_first() else {
        out.push(render(acc));
        return;
    };

    match token {
        PathToken::Segment(key) => {
            if let Some(child) = value.as_object().and_then(|m| m.get(key)) {
                acc.push(token.clone());
                expand_inner(child, tail, acc, out);
                acc.pop();
            }
        }
        PathToken::Index(i) => {
            if let Some(child) = child_at(value, *i) {
                acc.push(token.clone());
                expand_inner(child, tail, acc, out);
                acc.pop();
            }
        }
        PathToken::Wildcard => {
            let count = match value {
                Value::Array(items) => items.len(),
                Value::Object(map) => map.len(),
                _ => 0,
            };
            for i in 0..count {
                if let Some(child) = child_at(value, i) {
                    acc.push(PathToken::Index(i));
                    expand_inner(child, tail, acc, out);
                    acc.pop();
                }
            }
        }
    }
}
