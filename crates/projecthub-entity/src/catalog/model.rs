//! Catalog entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::visibility::Visibility;

/// A catalog entry together with its associations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Unique entry identifier.
    pub id: i64,
    /// Display title. Never blank.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Source repository link.
    pub repo_url: Option<String>,
    /// Live demo link.
    pub demo_url: Option<String>,
    /// Cover image link.
    pub cover_image_url: Option<String>,
    /// Identity of the creator. Immutable.
    pub creator_id: String,
    /// Listing visibility.
    pub visibility: Visibility,
    /// Remote file object, set only after a successful attach.
    pub file_id: Option<String>,
    /// The single associated course unit, if any.
    pub course_unit_id: Option<i64>,
    /// Tag names, sorted.
    pub tags: Vec<String>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was last modified.
    pub updated_at: DateTime<Utc>,
}

impl CatalogEntry {
    /// Check whether `identity` created this entry.
    pub fn is_owned_by(&self, identity: &str) -> bool {
        self.creator_id == identity
    }
}

/// The `catalog_entries` row without its associations.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogEntryRecord {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub creator_id: String,
    pub visibility: Visibility,
    pub file_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogEntryRecord {
    /// Combine the row with its associations.
    pub fn into_entry(self, course_unit_id: Option<i64>, mut tags: Vec<String>) -> CatalogEntry {
        tags.sort();
        CatalogEntry {
            id: self.id,
            title: self.title,
            description: self.description,
            repo_url: self.repo_url,
            demo_url: self.demo_url,
            cover_image_url: self.cover_image_url,
            creator_id: self.creator_id,
            visibility: self.visibility,
            file_id: self.file_id,
            course_unit_id,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Fields for inserting a new entry. The file reference is never part of
/// the insert; it is written only after the remote attach succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogEntry {
    pub title: String,
    pub description: Option<String>,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub creator_id: String,
    pub visibility: Visibility,
}

/// A partial update applied in a single write.
///
/// `None` leaves the field untouched. For the optional columns
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogEntryChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub repo_url: Option<Option<String>>,
    pub demo_url: Option<Option<String>>,
    pub cover_image_url: Option<Option<String>>,
    pub visibility: Option<Visibility>,
    pub file_id: Option<String>,
    pub course_unit_id: Option<Option<i64>>,
    pub tags: Option<Vec<String>>,
}
