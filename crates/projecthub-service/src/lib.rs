//! # projecthub-service
//!
//! Business logic for ProjectHub. The catalog side runs every write that
//! touches the remote files service as an explicit saga; the notification
//! side serves the caller's own notifications.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod catalog;
pub mod context;
pub mod notification;

pub use catalog::{
    AttachError, CreateCatalogEntry, FileAttacher, HttpFileAttacher, SagaCoordinator,
    SagaOutcome, SagaTransition, UpdateCatalogEntry,
};
pub use context::RequestContext;
pub use notification::NotificationService;
