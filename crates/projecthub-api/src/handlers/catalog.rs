//! Catalog entry handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use projecthub_entity::catalog::CatalogEntry;
use projecthub_service::SagaOutcome;

use crate::dto::request::{CreateCatalogEntryRequest, UpdateCatalogEntryRequest};
use crate::dto::response::{ApiResponse, DeletedResponse};
use crate::error::ApiError;
use crate::extractors::path::parse_id;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/catalog
pub async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateCatalogEntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SagaOutcome>>), ApiError> {
    let outcome = state.catalog_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(outcome))))
}

/// GET /api/catalog/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CatalogEntry>>, ApiError> {
    let entry = state.catalog_service.get(parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(entry)))
}

/// PATCH /api/catalog/{id}
pub async fn update_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateCatalogEntryRequest>,
) -> Result<Json<ApiResponse<SagaOutcome>>, ApiError> {
    let outcome = state
        .catalog_service
        .update(&auth, parse_id(&id)?, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// DELETE /api/catalog/{id}
pub async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    state.catalog_service.delete(&auth, parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(DeletedResponse { deleted: true })))
}
