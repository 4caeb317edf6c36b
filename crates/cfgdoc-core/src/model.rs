//! Documentation data model.
//!
//! These types represent the persisted state the engine operates on:
//! - `PropertyDoc`: documentation attached to one path (direct or template)
//! - `AssociativeArrayMapping`: a "this object behaves like an array"
//!   declaration
//! - `DocStore`: all documentation entries, keyed by path string

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Documentation attached to a single property path.
///
/// When `is_template` is true, `path` is a template path ("[*]" wildcards)
/// and the entry logically applies to every concrete path matching it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDoc {
    /// Concrete or template path this entry is keyed by.
    pub path: String,

    /// True if this entry is a template applying to all matching paths.
    #[serde(default)]
    pub is_template: bool,

    /// The concrete path the user was editing when the template was
    /// created. UI traceability only; never consulted by resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_template_path: Option<String>,

    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Named free-text documentation fields (e.g. "description").
    #[serde(default)]
    pub fields: BTreeMap<String, String>,

    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl PropertyDoc {
    /// Create an empty entry for a path.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Default::default()
        }
    }

    /// Create an empty template entry for a template path.
    pub fn new_template(path: &str) -> Self {
        Self {
            path: path.to_string(),
            is_template: true,
            ..Default::default()
        }
    }
}

/// A declaration that the object at `base_path` has its keys treated as
/// positional indices, equivalent to a real array.
///
/// `base_path` may itself contain "[*]" when an ancestor map was
/// registered first; that is how nested map structures are declared. The
/// mapping set is closed under prefix: registration promotes new base
/// paths against existing ancestors, and deregistration cascades to
/// children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociativeArrayMapping {
    /// Path of the map-like object, possibly wildcarded.
    pub base_path: String,

    /// When the mapping was declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AssociativeArrayMapping {
    /// Create a mapping without a timestamp.
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: base_path.to_string(),
            created_at: None,
        }
    }
}

/// All documentation entries, keyed by their path string.
///
/// At most one entry per literal key. Iteration is in sorted key order so
/// that resolution results never depend on insertion history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocStore {
    entries: BTreeMap<String, PropertyDoc>,
}

impl DocStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry keyed by its own `path`, replacing any previous
    /// entry under the same key.
    pub fn insert(&mut self, doc: PropertyDoc) -> Option<PropertyDoc> {
        self.entries.insert(doc.path.clone(), doc)
    }

    /// Remove the entry stored under a literal path key.
    pub fn remove(&mut self, path: &str) -> Option<PropertyDoc> {
        self.entries.remove(path)
    }

    /// Look up the entry stored under a literal path key.
    pub fn get(&self, path: &str) -> Option<&PropertyDoc> {
        self.entries.get(path)
    }

    /// True if an entry is stored under this literal key.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Iterate entries in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyDoc)> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_store_keyed_by_path() {
        let mut store = DocStore::new();
        let mut doc = PropertyDoc::new("Users[0]:Name");
        doc.tags.push("required".to_string());

        assert!(store.insert(doc).is_none());
        assert!(store.contains("Users[0]:Name"));
        assert_eq!(store.get("Users[0]:Name").unwrap().tags, ["required"]);
        assert_eq!(store.len(), 1);

        // Re-insert under the same key replaces.
        let replaced = store.insert(PropertyDoc::new("Users[0]:Name"));
        assert!(replaced.is_some());
        assert_eq!(store.len(), 1);
        assert!(store.get("Users[0]:Name").unwrap().tags.is_empty());
    }

    #[test]
    fn test_doc_store_serde_round_trip() {
        let mut store = DocStore::new();
        let mut doc = PropertyDoc::new_template("Users[*]:Name");
        doc.fields
            .insert("description".to_string(), "Login name".to_string());
        doc.source_template_path = Some("Users[0]:Name".to_string());
        store.insert(doc);

        let json = serde_json::to_string(&store).unwrap();
        assert!(json.contains("\"isTemplate\":true"));
        assert!(json.contains("\"sourceTemplatePath\":\"Users[0]:Name\""));

        let back: DocStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn test_property_doc_deserialize_defaults() {
        let json = r#"{"path": "A:B"}"#;
        let doc: PropertyDoc = serde_json::from_str(json).unwrap();

        assert_eq!(doc.path, "A:B");
        assert!(!doc.is_template);
        assert!(doc.tags.is_empty());
        assert!(doc.fields.is_empty());
        assert!(doc.modified_at.is_none());
    }

    #[test]
    fn test_mapping_serde() {
        let mapping = AssociativeArrayMapping::new("AppSettings:Fields");
        let json = serde_json::to_string(&mapping).unwrap();
        assert!(json.contains("\"basePath\":\"AppSettings:Fields\""));

        let back: AssociativeArrayMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mapping);
    }
}
