//! # cfgdoc-core
//!
//! Core template-path resolution engine for configuration documentation.
//!
//! This crate provides:
//! - Path grammar: tokenizing, template wildcarding and matching
//! - Soft-fail access into the JSON configuration tree
//! - Associative-array normalization (map keys to positional indices)
//! - Template resolution and field-level documentation merging
//! - Wildcard base-path promotion for new map declarations
//! - Documented-path collection for the export renderers
//!
//! Everything here is a deterministic pure function of its arguments:
//! no I/O, no hidden state, no async. Callers pass the tree, mapping
//! list and doc store as immutable-for-the-duration snapshots.

pub mod export;
pub mod model;
pub mod normalize;
pub mod path;
pub mod promote;
pub mod resolve;
pub mod tree;

pub use export::{collect_documented_paths, expand_template_path, DocumentedPath};
pub use model::{AssociativeArrayMapping, DocStore, PropertyDoc};
pub use normalize::normalize_associative_array_path;
pub use path::{has_array_index, matches_template_path, normalize_to_template_path, PathToken};
pub use promote::convert_to_wildcard_base_path;
pub use resolve::{
    find_and_merge_documentation, find_documentation_for_path, find_template_for_path,
    get_template_path_for_concrete, merge_documentation,
};
pub use tree::get_value_by_path;
