//! PostgreSQL store implementations.

pub mod catalog;
pub mod notification;

pub use catalog::CatalogRepository;
pub use notification::NotificationRepository;
