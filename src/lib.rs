//! Plain-text Electronic Parts Inventory
//!
//! Categories, footprints, storage locations, manufacturers and suppliers
//! form named hierarchies; parts reference them and carry the stocked
//! lots. Everything is YAML documents stored in a directory tree.

pub mod domain;
pub use domain::{Config, ElementId, ElementKind, Name, Part, PartId, StructuralElement};

/// Filesystem storage and the in-memory store.
pub mod storage;
pub use storage::{ElementStore, InventoryStore, PartStore, Warehouse};
