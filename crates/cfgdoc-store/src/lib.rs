//! # cfgdoc-store
//!
//! Stateful management around the cfgdoc-core engine:
//! - Mapping registry (registration with wildcard promotion,
//!   deregistration with cascade)
//! - Storage abstraction and framework-agnostic handler logic
//!
//! The persistence format and the transport wrapping these handlers are
//! deliberately left to the caller.

pub mod registry;
pub mod storage;

pub use registry::MappingRegistry;
pub use storage::{DocHandlers, DocStorage, StorageError};
