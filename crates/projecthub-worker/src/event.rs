//! Upstream event parsing and notification templating.

use serde_json::{Map, Value};
use thiserror::Error;

use projecthub_entity::notification::NewNotification;

/// The only event kind that produces a notification.
pub const FILE_READY_EVENT: &str = "project.file.ready";

/// Notification kind used when the event does not name one.
pub const DEFAULT_NOTIFICATION_KIND: &str = "PROJECT_FILE_READY";

/// Title of every file-ready notification.
pub const FILE_READY_TITLE: &str = "File available";

/// A delivery that can never be processed. Acknowledged and dropped.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("payload is not a JSON object: {0}")]
    Malformed(String),
    #[error("payload has no subject user")]
    MissingSubject,
}

/// Outcome of parsing one delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedEvent {
    /// A recognized file-ready event.
    FileReady(FileReadyEvent),
    /// Any other kind; acknowledged without effect.
    Ignored { event: Option<String> },
}

/// A file-ready event addressed to one user.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReadyEvent {
    pub subject_user_id: String,
    pub original_name: Option<String>,
    pub entry_id: Option<String>,
    pub kind: String,
    pub event_id: Option<String>,
    /// The full event, kept verbatim on the notification.
    pub payload: Value,
}

impl FileReadyEvent {
    /// Build the notification row. The event id is only carried as an
    /// idempotency key when `deduplicate` is on.
    pub fn to_notification(&self, deduplicate: bool) -> NewNotification {
        NewNotification {
            user_id: self.subject_user_id.clone(),
            kind: self.kind.clone(),
            title: FILE_READY_TITLE.to_string(),
            message: self.message(),
            payload: self.payload.clone(),
            source_event_id: if deduplicate {
                self.event_id.clone()
            } else {
                None
            },
        }
    }

    fn message(&self) -> String {
        let file = match &self.original_name {
            Some(name) => format!("The file \"{name}\""),
            None => "The file".to_string(),
        };
        let entry = match &self.entry_id {
            Some(id) => format!(" in project {id}"),
            None => String::new(),
        };
        format!("{file} is now available{entry}.")
    }
}

/// Parse a raw delivery.
///
/// The subject user is checked before the kind, so a payload without one is
/// a poison message whatever its kind.
pub fn parse_event(raw: &[u8]) -> Result<ParsedEvent, EventError> {
    let payload: Value =
        serde_json::from_slice(raw).map_err(|e| EventError::Malformed(e.to_string()))?;
    let Value::Object(fields) = &payload else {
        return Err(EventError::Malformed("top-level value is not an object".into()));
    };

    let subject_user_id =
        first_text(fields, &["userId", "subjectUserId"]).ok_or(EventError::MissingSubject)?;

    let event = first_text(fields, &["event"]);
    if event.as_deref() != Some(FILE_READY_EVENT) {
        return Ok(ParsedEvent::Ignored { event });
    }

    Ok(ParsedEvent::FileReady(FileReadyEvent {
        subject_user_id,
        original_name: first_text(fields, &["originalName"]),
        entry_id: first_text(fields, &["projectId", "entryId"]),
        kind: first_text(fields, &["type"]).unwrap_or_else(|| DEFAULT_NOTIFICATION_KIND.into()),
        event_id: first_text(fields, &["eventId"]),
        payload: payload.clone(),
    }))
}

/// The first of `keys` holding a non-empty string or an integer.
fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|key| fields.get(*key)).find_map(|value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    })
}
