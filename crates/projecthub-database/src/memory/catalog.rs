//! In-memory catalog store.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use projecthub_core::result::AppResult;
use projecthub_entity::catalog::{
    CatalogEntry, CatalogEntryChanges, CatalogEntryRecord, NewCatalogEntry,
};

use crate::store::CatalogStore;

#[derive(Debug, Clone)]
struct StoredEntry {
    record: CatalogEntryRecord,
    course_unit_id: Option<i64>,
    tags: BTreeSet<String>,
}

impl StoredEntry {
    fn to_entry(&self) -> CatalogEntry {
        self.record
            .clone()
            .into_entry(self.course_unit_id, self.tags.iter().cloned().collect())
    }
}

/// Catalog store backed by a [`DashMap`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    entries: Arc<DashMap<i64, StoredEntry>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryCatalogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn insert_entry(&self, entry: &NewCatalogEntry) -> AppResult<CatalogEntryRecord> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let record = CatalogEntryRecord {
            id,
            title: entry.title.clone(),
            description: entry.description.clone(),
            repo_url: entry.repo_url.clone(),
            demo_url: entry.demo_url.clone(),
            cover_image_url: entry.cover_image_url.clone(),
            creator_id: entry.creator_id.clone(),
            visibility: entry.visibility,
            file_id: None,
            created_at: now,
            updated_at: now,
        };
        self.entries.insert(
            id,
            StoredEntry {
                record: record.clone(),
                course_unit_id: None,
                tags: BTreeSet::new(),
            },
        );
        Ok(record)
    }

    async fn replace_tags(&self, entry_id: i64, tags: &[String]) -> AppResult<()> {
        if let Some(mut stored) = self.entries.get_mut(&entry_id) {
            stored.tags = tags.iter().cloned().collect();
        }
        Ok(())
    }

    async fn replace_course_unit(
        &self,
        entry_id: i64,
        course_unit_id: Option<i64>,
    ) -> AppResult<()> {
        if let Some(mut stored) = self.entries.get_mut(&entry_id) {
            stored.course_unit_id = course_unit_id;
        }
        Ok(())
    }

    async fn set_file_ref(&self, entry_id: i64, file_id: &str) -> AppResult<bool> {
        Ok(match self.entries.get_mut(&entry_id) {
            Some(mut stored) => {
                stored.record.file_id = Some(file_id.to_string());
                stored.record.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn find_entry(&self, entry_id: i64) -> AppResult<Option<CatalogEntry>> {
        Ok(self.entries.get(&entry_id).map(|stored| stored.to_entry()))
    }

    async fn apply_changes(
        &self,
        entry_id: i64,
        changes: &CatalogEntryChanges,
    ) -> AppResult<Option<CatalogEntry>> {
        let Some(mut stored) = self.entries.get_mut(&entry_id) else {
            return Ok(None);
        };

        let record = &mut stored.record;
        if let Some(title) = &changes.title {
            record.title = title.clone();
        }
        if let Some(description) = &changes.description {
            record.description = description.clone();
        }
        if let Some(repo_url) = &changes.repo_url {
            record.repo_url = repo_url.clone();
        }
        if let Some(demo_url) = &changes.demo_url {
            record.demo_url = demo_url.clone();
        }
        if let Some(cover_image_url) = &changes.cover_image_url {
            record.cover_image_url = cover_image_url.clone();
        }
        if let Some(visibility) = changes.visibility {
            record.visibility = visibility;
        }
        if let Some(file_id) = &changes.file_id {
            record.file_id = Some(file_id.clone());
        }
        record.updated_at = Utc::now();

        if let Some(tags) = &changes.tags {
            stored.tags = tags.iter().cloned().collect();
        }
        if let Some(course_unit_id) = changes.course_unit_id {
            stored.course_unit_id = course_unit_id;
        }

        Ok(Some(stored.to_entry()))
    }

    async fn delete_entry(&self, entry_id: i64) -> AppResult<bool> {
        Ok(self.entries.remove(&entry_id).is_some())
    }
}
