//! Request DTOs with validation.
//!
//! Shape limits are checked here; domain rules (required title and file,
//! course unit parsing, tag normalization) belong to the catalog service.

use serde::{Deserialize, Serialize};
use validator::Validate;

use projecthub_entity::catalog::Visibility;
use projecthub_service::{CreateCatalogEntry, UpdateCatalogEntry};

/// `POST /api/catalog` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCatalogEntryRequest {
    /// Display title.
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    #[serde(default)]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 2048))]
    pub repo_url: Option<String>,
    #[validate(length(max = 2048))]
    pub demo_url: Option<String>,
    #[validate(length(max = 2048))]
    pub cover_image_url: Option<String>,
    pub visibility: Option<Visibility>,
    /// Remote file to attach.
    #[validate(length(max = 255))]
    pub file_id: Option<String>,
    #[validate(length(max = 1, message = "At most one course unit may be linked"))]
    #[serde(default)]
    pub course_unit_ids: Vec<String>,
    #[validate(length(max = 32, message = "At most 32 tags"))]
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<CreateCatalogEntryRequest> for CreateCatalogEntry {
    fn from(req: CreateCatalogEntryRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            repo_url: req.repo_url,
            demo_url: req.demo_url,
            cover_image_url: req.cover_image_url,
            visibility: req.visibility,
            file_id: req.file_id,
            course_unit_ids: req.course_unit_ids,
            tags: req.tags,
        }
    }
}

/// `PATCH /api/catalog/{id}` body. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCatalogEntryRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 2048))]
    pub repo_url: Option<String>,
    #[validate(length(max = 2048))]
    pub demo_url: Option<String>,
    #[validate(length(max = 2048))]
    pub cover_image_url: Option<String>,
    pub visibility: Option<Visibility>,
    #[validate(length(max = 255))]
    pub file_id: Option<String>,
    #[validate(length(max = 1, message = "At most one course unit may be linked"))]
    pub course_unit_ids: Option<Vec<String>>,
    #[validate(length(max = 32, message = "At most 32 tags"))]
    pub tags: Option<Vec<String>>,
}

impl From<UpdateCatalogEntryRequest> for UpdateCatalogEntry {
    fn from(req: UpdateCatalogEntryRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            repo_url: req.repo_url,
            demo_url: req.demo_url,
            cover_image_url: req.cover_image_url,
            visibility: req.visibility,
            file_id: req.file_id,
            course_unit_ids: req.course_unit_ids,
            tags: req.tags,
        }
    }
}
