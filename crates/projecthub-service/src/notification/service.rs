//! Notification listing and mark-read.

use std::sync::Arc;

use tracing::info;

use projecthub_core::error::AppError;
use projecthub_core::types::{PageRequest, PageResponse};
use projecthub_database::NotificationStore;
use projecthub_entity::notification::Notification;

use crate::context::RequestContext;

/// Serves the caller's own notifications.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Lists notifications for the current user, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<PageResponse<Notification>, AppError> {
        self.store
            .list_for_user(ctx.user_id(), unread_only, page)
            .await
    }

    /// Marks one of the caller's unread notifications as read.
    ///
    /// A second call for the same notification finds nothing to flip and
    /// reports `NotFound`, leaving the row as it is.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: i64,
    ) -> Result<Notification, AppError> {
        let notification = self
            .store
            .mark_read(notification_id, ctx.user_id())
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found or already read"))?;

        info!(
            user_id = %ctx.user_id(),
            notification_id,
            "Notification marked as read"
        );
        Ok(notification)
    }
}
