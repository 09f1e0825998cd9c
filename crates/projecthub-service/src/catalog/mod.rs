//! Catalog entry writes coordinated with the remote files service.

pub mod attach;
pub mod saga;
pub mod service;
pub mod validation;

pub use attach::{AttachError, FileAttacher, HttpFileAttacher};
pub use saga::{SagaLog, SagaOutcome, SagaTransition};
pub use service::SagaCoordinator;
pub use validation::{CreateCatalogEntry, UpdateCatalogEntry};
