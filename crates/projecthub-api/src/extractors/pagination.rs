//! Query parameters for the notification list.

use serde::{Deserialize, Serialize};

use projecthub_core::types::PageRequest;

/// `GET /api/notifications?unread=&limit=&offset=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationQuery {
    /// Only unread notifications when `true`.
    #[serde(default)]
    pub unread: bool,
    /// Items per page (default: 20, max: 100).
    pub limit: Option<u64>,
    /// Items to skip.
    pub offset: Option<u64>,
}

impl NotificationQuery {
    /// Converts to a clamped `PageRequest`.
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.limit, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_clamped() {
        let query = NotificationQuery {
            unread: false,
            limit: Some(500),
            offset: Some(40),
        };
        let page = query.page();
        assert_eq!(page.limit, 100);
        assert_eq!(page.offset, 40);
    }

    #[test]
    fn test_defaults() {
        let page = NotificationQuery::default().page();
        assert_eq!(page.limit, 20);
        assert_eq!(page.offset, 0);
    }
}
