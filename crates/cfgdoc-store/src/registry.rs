//! Associative-array mapping registry.
//!
//! Holds the live set of "this object behaves like an array" declarations
//! and keeps it consistent: registration promotes the new base path
//! against already-declared ancestors, deregistration cascades to child
//! mappings that are meaningless without their parent.

use cfgdoc_core::{convert_to_wildcard_base_path, AssociativeArrayMapping};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

/// The set of declared associative-array mappings.
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    mappings: Vec<AssociativeArrayMapping>,
}

impl MappingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from persisted mappings.
    pub fn from_mappings(mappings: Vec<AssociativeArrayMapping>) -> Self {
        Self { mappings }
    }

    /// The current declarations, in registration order.
    pub fn mappings(&self) -> &[AssociativeArrayMapping] {
        &self.mappings
    }

    /// True if a mapping is stored under exactly this base path.
    pub fn is_registered(&self, base_path: &str) -> bool {
        self.mappings.iter().any(|m| m.base_path == base_path)
    }

    /// Declare the object at `path` to be map-like.
    ///
    /// The stored base path is the canonical wildcarded form computed
    /// against the existing declarations, so it covers all sibling keys
    /// under any ancestor map. Returns the stored base path; registering
    /// a path that promotes to an already-registered base is a no-op.
    pub fn register(&mut self, path: &str, tree: &Value) -> String {
        let base_path = convert_to_wildcard_base_path(path, &self.mappings, tree);

        if self.is_registered(&base_path) {
            debug!(base_path = %base_path, "mapping already registered");
            return base_path;
        }

        info!(path = %path, base_path = %base_path, "registering associative-array mapping");
        self.mappings.push(AssociativeArrayMapping {
            base_path: base_path.clone(),
            created_at: Some(Utc::now()),
        });
        base_path
    }

    /// Remove a mapping and every child mapping rooted under it.
    ///
    /// A child's base path begins with `base_path + "[*]"`; without the
    /// parent those declarations can never normalize, so they go too.
    /// Returns the number of mappings removed.
    pub fn unregister(&mut self, base_path: &str) -> usize {
        let child_prefix = format!("{base_path}[*]");
        let before = self.mappings.len();
        self.mappings
            .retain(|m| m.base_path != base_path && !m.base_path.starts_with(&child_prefix));
        let removed = before - self.mappings.len();

        if removed > 0 {
            info!(base_path = %base_path, removed, "deregistered associative-array mapping");
        } else {
            debug!(base_path = %base_path, "no mapping to deregister");
        }
        removed
    }
}
