//! Notification handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use projecthub_core::types::PageResponse;
use projecthub_entity::notification::Notification;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::path::parse_id;
use crate::extractors::{AuthUser, NotificationQuery};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<NotificationQuery>,
) -> Result<Json<ApiResponse<PageResponse<Notification>>>, ApiError> {
    let page = state
        .notification_service
        .list(&auth, params.unread, params.page())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Notification>>, ApiError> {
    let notification = state
        .notification_service
        .mark_read(&auth, parse_id(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(notification)))
}
