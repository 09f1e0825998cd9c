//! # projecthub-database
//!
//! PostgreSQL connection management, the store traits the services are
//! written against, and their PostgreSQL and in-memory implementations.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{CatalogStore, InsertOutcome, NotificationStore};
