//! In-memory notification store.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use projecthub_core::result::AppResult;
use projecthub_core::types::{PageRequest, PageResponse};
use projecthub_entity::notification::{NewNotification, Notification};

use crate::store::{InsertOutcome, NotificationStore};

/// Notification store backed by a [`DashMap`].
#[derive(Debug, Clone, Default)]
pub struct MemoryNotificationStore {
    rows: Arc<DashMap<i64, Notification>>,
    by_source_event: Arc<DashMap<String, i64>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored notification, oldest first.
    pub fn all(&self) -> Vec<Notification> {
        let mut rows: Vec<Notification> = self.rows.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(|n| n.id);
        rows
    }

    fn build_row(&self, notification: &NewNotification) -> Notification {
        Notification {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: notification.user_id.clone(),
            kind: notification.kind.clone(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            payload: notification.payload.clone(),
            is_read: false,
            source_event_id: notification.source_event_id.clone(),
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(&self, notification: &NewNotification) -> AppResult<InsertOutcome> {
        let row = match &notification.source_event_id {
            Some(key) => match self.by_source_event.entry(key.clone()) {
                Entry::Occupied(_) => return Ok(InsertOutcome::Duplicate),
                Entry::Vacant(slot) => {
                    let row = self.build_row(notification);
                    slot.insert(row.id);
                    row
                }
            },
            None => self.build_row(notification),
        };
        self.rows.insert(row.id, row.clone());
        Ok(InsertOutcome::Inserted(row))
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        unread_only: bool,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let mut matching: Vec<Notification> = self
            .rows
            .iter()
            .filter(|r| r.user_id == user_id && (!unread_only || !r.is_read))
            .map(|r| r.value().clone())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn mark_read(&self, id: i64, user_id: &str) -> AppResult<Option<Notification>> {
        Ok(match self.rows.get_mut(&id) {
            Some(mut row) if row.user_id == user_id && !row.is_read => {
                row.is_read = true;
                Some(row.clone())
            }
            _ => None,
        })
    }
}
