//! Store traits the services are written against.
//!
//! Both traits have a PostgreSQL implementation in [`crate::repositories`]
//! and an in-memory one in [`crate::memory`]. Implementations must agree on
//! the invariants documented per method.

use async_trait::async_trait;

use projecthub_core::result::AppResult;
use projecthub_core::types::{PageRequest, PageResponse};
use projecthub_entity::catalog::{
    CatalogEntry, CatalogEntryChanges, CatalogEntryRecord, NewCatalogEntry,
};
use projecthub_entity::notification::{NewNotification, Notification};

/// Persistence for catalog entries and their associations.
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    /// Insert a row with no file reference.
    async fn insert_entry(&self, entry: &NewCatalogEntry) -> AppResult<CatalogEntryRecord>;

    /// Replace the tag set of an entry. Names are expected normalized.
    async fn replace_tags(&self, entry_id: i64, tags: &[String]) -> AppResult<()>;

    /// Replace the course unit of an entry. Never merges; `None` clears.
    async fn replace_course_unit(&self, entry_id: i64, course_unit_id: Option<i64>)
    -> AppResult<()>;

    /// Record the attached file reference. Returns `false` if the row is gone.
    async fn set_file_ref(&self, entry_id: i64, file_id: &str) -> AppResult<bool>;

    /// Load an entry with its associations.
    async fn find_entry(&self, entry_id: i64) -> AppResult<Option<CatalogEntry>>;

    /// Apply a partial update atomically. Returns `None` if the row is gone.
    async fn apply_changes(
        &self,
        entry_id: i64,
        changes: &CatalogEntryChanges,
    ) -> AppResult<Option<CatalogEntry>>;

    /// Delete an entry and its associations. Returns `true` if a row was removed.
    async fn delete_entry(&self, entry_id: i64) -> AppResult<bool>;
}

/// Result of a notification insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// A new row was written.
    Inserted(Notification),
    /// A row with the same `source_event_id` already exists; nothing written.
    Duplicate,
}

/// Persistence for notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Insert a notification. Only a non-null `source_event_id` can collide.
    async fn insert(&self, notification: &NewNotification) -> AppResult<InsertOutcome>;

    /// List a user's notifications, newest first.
    async fn list_for_user(
        &self,
        user_id: &str,
        unread_only: bool,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Flip `is_read` from false to true for a notification owned by
    /// `user_id`. Returns `None` when it is missing, foreign, or already read.
    async fn mark_read(&self, id: i64, user_id: &str) -> AppResult<Option<Notification>>;
}
