//! Per-delivery handling: parse, filter, insert, then decide the ack.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use projecthub_database::{InsertOutcome, NotificationStore};

use crate::event::{ParsedEvent, parse_event};

/// What to tell the broker about a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Done with it, successfully or as a poison message.
    Ack,
    /// Redeliver immediately.
    Requeue,
}

/// Turns deliveries into notifications.
///
/// Delivery is at-least-once. Unless `deduplicate` is on, a redelivered
/// event produces a second notification.
#[derive(Clone)]
pub struct NotificationIngestor {
    store: Arc<dyn NotificationStore>,
    deduplicate: bool,
}

impl std::fmt::Debug for NotificationIngestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationIngestor")
            .field("deduplicate", &self.deduplicate)
            .finish_non_exhaustive()
    }
}

impl NotificationIngestor {
    /// Create an ingestor writing to `store`.
    pub fn new(store: Arc<dyn NotificationStore>, deduplicate: bool) -> Self {
        Self { store, deduplicate }
    }

    /// Handle one delivery. Only a store failure asks for redelivery.
    pub async fn handle(&self, subject: &str, payload: &[u8]) -> Disposition {
        let event = match parse_event(payload) {
            Ok(ParsedEvent::FileReady(event)) => event,
            Ok(ParsedEvent::Ignored { event }) => {
                debug!(subject, event = event.as_deref().unwrap_or(""), "Ignoring event");
                return Disposition::Ack;
            }
            Err(e) => {
                warn!(subject, error = %e, bytes = payload.len(), "Dropping poison message");
                return Disposition::Ack;
            }
        };

        match self.store.insert(&event.to_notification(self.deduplicate)).await {
            Ok(InsertOutcome::Inserted(notification)) => {
                info!(
                    subject,
                    notification_id = notification.id,
                    user_id = %notification.user_id,
                    "Notification created"
                );
                Disposition::Ack
            }
            Ok(InsertOutcome::Duplicate) => {
                info!(
                    subject,
                    event_id = event.event_id.as_deref().unwrap_or(""),
                    "Duplicate event delivery skipped"
                );
                Disposition::Ack
            }
            Err(e) => {
                error!(subject, error = %e, "Failed to store notification; requeueing");
                Disposition::Requeue
            }
        }
    }
}
