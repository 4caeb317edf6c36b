//! Documentation storage abstraction.
//!
//! This module provides a trait for persisting the doc store and the
//! mapping list so the handler logic can be shared across backends
//! (files, embedded flash, databases). The serialization format is the
//! backend's choice; the engine only ever sees the in-memory types.

use cfgdoc_core::{
    find_and_merge_documentation, find_documentation_for_path, AssociativeArrayMapping, DocStore,
    PropertyDoc,
};
use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::registry::MappingRegistry;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested data was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to read from the backend.
    #[error("Read error: {0}")]
    ReadError(String),

    /// Failed to write to the backend.
    #[error("Write error: {0}")]
    WriteError(String),

    /// Stored data could not be decoded.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Abstract persistence for documentation state.
///
/// All methods are synchronous so implementations stay usable from
/// non-async contexts; async wrappers belong to the framework layer.
pub trait DocStorage: Send + Sync {
    /// Load the documentation store.
    fn load_doc_store(&self) -> Result<DocStore, StorageError>;

    /// Save the documentation store.
    fn save_doc_store(&self, store: &DocStore) -> Result<(), StorageError>;

    /// Load the associative-array mapping list.
    fn load_mappings(&self) -> Result<Vec<AssociativeArrayMapping>, StorageError>;

    /// Save the associative-array mapping list.
    fn save_mappings(&self, mappings: &[AssociativeArrayMapping]) -> Result<(), StorageError>;
}

/// Framework-agnostic handler logic for documentation endpoints.
///
/// These functions contain the business logic the UI and HTTP layers
/// call; framework-specific code wraps them with its request/response
/// types.
pub struct DocHandlers;

impl DocHandlers {
    /// The entry that documents `path`, direct entry preferred.
    pub fn get_documentation<S: DocStorage>(
        storage: &S,
        path: &str,
        tree: Option<&Value>,
    ) -> Result<Option<PropertyDoc>, StorageError> {
        let store = load_or_default(storage.load_doc_store())?;
        let mappings = load_or_default(storage.load_mappings())?;
        Ok(find_documentation_for_path(path, &store, &mappings, tree).cloned())
    }

    /// The effective documentation for `path`: direct entry with blank
    /// spots filled from the matching template.
    pub fn effective_documentation<S: DocStorage>(
        storage: &S,
        path: &str,
        tree: Option<&Value>,
    ) -> Result<Option<PropertyDoc>, StorageError> {
        let store = load_or_default(storage.load_doc_store())?;
        let mappings = load_or_default(storage.load_mappings())?;
        Ok(find_and_merge_documentation(path, &store, &mappings, tree))
    }

    /// Create or replace a documentation entry, stamping `modified_at`.
    pub fn put_documentation<S: DocStorage>(
        storage: &S,
        mut doc: PropertyDoc,
    ) -> Result<(), StorageError> {
        doc.modified_at = Some(Utc::now());
        debug!(path = %doc.path, is_template = doc.is_template, "saving documentation entry");

        let mut store = load_or_default(storage.load_doc_store())?;
        store.insert(doc);
        storage.save_doc_store(&store)
    }

    /// Delete the entry stored under a literal path key.
    ///
    /// Returns the removed entry, if any.
    pub fn delete_documentation<S: DocStorage>(
        storage: &S,
        path: &str,
    ) -> Result<Option<PropertyDoc>, StorageError> {
        let mut store = load_or_default(storage.load_doc_store())?;
        let removed = store.remove(path);
        if removed.is_some() {
            debug!(path = %path, "deleted documentation entry");
            storage.save_doc_store(&store)?;
        }
        Ok(removed)
    }

    /// Declare the object at `path` to be map-like.
    ///
    /// Returns the canonical base path that was stored.
    pub fn register_mapping<S: DocStorage>(
        storage: &S,
        path: &str,
        tree: &Value,
    ) -> Result<String, StorageError> {
        let mut registry = MappingRegistry::from_mappings(load_or_default(storage.load_mappings())?);
        let base_path = registry.register(path, tree);
        storage.save_mappings(registry.mappings())?;
        Ok(base_path)
    }

    /// Remove a mapping and its children; returns how many were removed.
    pub fn unregister_mapping<S: DocStorage>(
        storage: &S,
        base_path: &str,
    ) -> Result<usize, StorageError> {
        let mut registry = MappingRegistry::from_mappings(load_or_default(storage.load_mappings())?);
        let removed = registry.unregister(base_path);
        if removed > 0 {
            storage.save_mappings(registry.mappings())?;
        }
        Ok(removed)
    }
}

/// A backend that has never been written to reports `NotFound`; for read
/// paths that is simply "empty state".
fn load_or_default<T: Default>(result: Result<T, StorageError>) -> Result<T, StorageError> {
    match result {
        Ok(value) => Ok(value),
        Err(StorageError::NotFound(_)) => Ok(T::default()),
        Err(e) => Err(e),
    }
}
