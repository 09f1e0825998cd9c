//! Catalog entry domain entities.

pub mod model;
pub mod visibility;

pub use model::{CatalogEntry, CatalogEntryChanges, CatalogEntryRecord, NewCatalogEntry};
pub use visibility::Visibility;
