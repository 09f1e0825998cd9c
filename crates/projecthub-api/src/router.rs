//! Route definitions for the ProjectHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with every route and the per-request middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(catalog_routes())
        .merge(notification_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Catalog entry writes and reads
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", post(handlers::catalog::create_entry))
        .route(
            "/catalog/{id}",
            get(handlers::catalog::get_entry)
                .patch(handlers::catalog::update_entry)
                .delete(handlers::catalog::delete_entry),
        )
}

/// The caller's own notifications
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list_notifications))
        .route("/notifications/{id}/read", post(handlers::notification::mark_read))
}
