//! Input validation for catalog writes. Runs before any side effect.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use projecthub_core::error::AppError;
use projecthub_entity::catalog::{CatalogEntryChanges, NewCatalogEntry, Visibility};

/// Request to create a catalog entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCatalogEntry {
    pub title: String,
    pub description: Option<String>,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub visibility: Option<Visibility>,
    /// The remote file to attach. Required.
    pub file_id: Option<String>,
    /// At most one course unit id, as a numeric string.
    #[serde(default)]
    pub course_unit_ids: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request to update a catalog entry. Absent fields are left untouched;
/// a blank optional text field clears it, as on create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCatalogEntry {
    pub title: Option<String>,
    pub description: Option<String>,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub visibility: Option<Visibility>,
    /// A new remote file; attached before anything is written locally.
    pub file_id: Option<String>,
    /// Replaces the course unit. An empty list clears it.
    pub course_unit_ids: Option<Vec<String>>,
    /// Replaces the tag set.
    pub tags: Option<Vec<String>>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCreate {
    pub entry: NewCatalogEntry,
    pub file_id: String,
    pub course_unit_id: Option<i64>,
    pub tags: Vec<String>,
}

/// Validate a create request for `creator_id`.
pub fn validate_create(req: CreateCatalogEntry, creator_id: &str) -> Result<ValidatedCreate, AppError> {
    let title = non_blank("title", &req.title)?;
    let file_id = req
        .file_id
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::validation("fileId is required"))?
        .to_string();
    let course_unit_id = parse_course_unit(&req.course_unit_ids)?;

    Ok(ValidatedCreate {
        entry: NewCatalogEntry {
            title,
            description: optional_text(req.description),
            repo_url: optional_text(req.repo_url),
            demo_url: optional_text(req.demo_url),
            cover_image_url: optional_text(req.cover_image_url),
            creator_id: creator_id.to_string(),
            visibility: req.visibility.unwrap_or_default(),
        },
        file_id,
        course_unit_id,
        tags: normalize_tags(&req.tags),
    })
}

/// Validate an update request.
pub fn validate_update(req: UpdateCatalogEntry) -> Result<CatalogEntryChanges, AppError> {
    let title = req.title.as_deref().map(|t| non_blank("title", t)).transpose()?;
    let file_id = req.file_id.as_deref().map(|f| non_blank("fileId", f)).transpose()?;
    let course_unit_id = req
        .course_unit_ids
        .as_deref()
        .map(parse_course_unit)
        .transpose()?;

    Ok(CatalogEntryChanges {
        title,
        description: req.description.map(|d| optional_text(Some(d))),
        repo_url: req.repo_url.map(|u| optional_text(Some(u))),
        demo_url: req.demo_url.map(|u| optional_text(Some(u))),
        cover_image_url: req.cover_image_url.map(|u| optional_text(Some(u))),
        visibility: req.visibility,
        file_id,
        course_unit_id,
        tags: req.tags.as_deref().map(normalize_tags),
    })
}

/// Trim, drop blanks, de-duplicate. The result is sorted.
pub fn normalize_tags(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Parse the 0-or-1 course unit reference.
pub fn parse_course_unit(refs: &[String]) -> Result<Option<i64>, AppError> {
    match refs {
        [] => Ok(None),
        [single] => single
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid course unit id '{single}'"))),
        _ => Err(AppError::validation(
            "At most one course unit may be associated with an entry",
        )),
    }
}

fn non_blank(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
