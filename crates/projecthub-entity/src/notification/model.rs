//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A notification addressed to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: i64,
    /// The recipient.
    pub user_id: String,
    /// Notification kind, e.g. `PROJECT_FILE_READY`.
    pub kind: String,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// The source event, stored verbatim.
    pub payload: serde_json::Value,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// Idempotency key of the source event, when deduplication is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_event_id: Option<String>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub payload: serde_json::Value,
    pub source_event_id: Option<String>,
}
