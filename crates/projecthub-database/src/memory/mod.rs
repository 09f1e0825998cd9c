//! Process-local store implementations.
//!
//! Used when `database.provider = "memory"` and throughout the test
//! suites. They hold the same invariants as the PostgreSQL stores.

pub mod catalog;
pub mod notification;

pub use catalog::MemoryCatalogStore;
pub use notification::MemoryNotificationStore;
