//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use projecthub_auth::IdentityResolver;
use projecthub_core::config::AppConfig;
use projecthub_service::{NotificationService, SagaCoordinator};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Resolves the caller from the trusted header or a bearer token
    pub identity_resolver: Arc<IdentityResolver>,
    /// Catalog writes, each run as a saga
    pub catalog_service: Arc<SagaCoordinator>,
    /// Notification reads and mark-read
    pub notification_service: Arc<NotificationService>,
}
