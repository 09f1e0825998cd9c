//! Catalog entry repository implementation.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use projecthub_core::error::{AppError, ErrorKind};
use projecthub_core::result::AppResult;
use projecthub_entity::catalog::{
    CatalogEntry, CatalogEntryChanges, CatalogEntryRecord, NewCatalogEntry,
};

use crate::store::CatalogStore;

const ENTRY_COLUMNS: &str = "id, title, description, repo_url, demo_url, cover_image_url, \
     creator_id, visibility, file_id, created_at, updated_at";

/// PostgreSQL-backed catalog store.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    /// Create a new catalog repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

async fn write_tags(conn: &mut PgConnection, entry_id: i64, tags: &[String]) -> AppResult<()> {
    sqlx::query("DELETE FROM catalog_entry_tags WHERE entry_id = $1")
        .bind(entry_id)
        .execute(&mut *conn)
        .await
        .map_err(db_err("Failed to clear tags"))?;

    for name in tags {
        let tag_id: i64 = sqlx::query_scalar(
            "INSERT INTO tags (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id",
        )
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_err("Failed to upsert tag"))?;

        sqlx::query(
            "INSERT INTO catalog_entry_tags (entry_id, tag_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(entry_id)
        .bind(tag_id)
        .execute(&mut *conn)
        .await
        .map_err(db_err("Failed to link tag"))?;
    }
    Ok(())
}

async fn write_course_unit(
    conn: &mut PgConnection,
    entry_id: i64,
    course_unit_id: Option<i64>,
) -> AppResult<()> {
    sqlx::query("DELETE FROM catalog_entry_course_units WHERE entry_id = $1")
        .bind(entry_id)
        .execute(&mut *conn)
        .await
        .map_err(db_err("Failed to clear course unit"))?;

    if let Some(course_unit_id) = course_unit_id {
        sqlx::query(
            "INSERT INTO catalog_entry_course_units (entry_id, course_unit_id) VALUES ($1, $2)",
        )
        .bind(entry_id)
        .bind(course_unit_id)
        .execute(&mut *conn)
        .await
        .map_err(db_err("Failed to link course unit"))?;
    }
    Ok(())
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    async fn insert_entry(&self, entry: &NewCatalogEntry) -> AppResult<CatalogEntryRecord> {
        sqlx::query_as::<_, CatalogEntryRecord>(&format!(
            "INSERT INTO catalog_entries \
             (title, description, repo_url, demo_url, cover_image_url, creator_id, visibility) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(&entry.title)
        .bind(&entry.description)
        .bind(&entry.repo_url)
        .bind(&entry.demo_url)
        .bind(&entry.cover_image_url)
        .bind(&entry.creator_id)
        .bind(entry.visibility)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to insert catalog entry"))
    }

    async fn replace_tags(&self, entry_id: i64, tags: &[String]) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;
        write_tags(&mut tx, entry_id, tags).await?;
        tx.commit()
            .await
            .map_err(db_err("Failed to commit tags"))
    }

    async fn replace_course_unit(
        &self,
        entry_id: i64,
        course_unit_id: Option<i64>,
    ) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;
        write_course_unit(&mut tx, entry_id, course_unit_id).await?;
        tx.commit()
            .await
            .map_err(db_err("Failed to commit course unit"))
    }

    async fn set_file_ref(&self, entry_id: i64, file_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE catalog_entries SET file_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(entry_id)
        .bind(file_id)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to record file reference"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_entry(&self, entry_id: i64) -> AppResult<Option<CatalogEntry>> {
        let record = sqlx::query_as::<_, CatalogEntryRecord>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM catalog_entries WHERE id = $1"
        ))
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find catalog entry"))?;

        let Some(record) = record else {
            return Ok(None);
        };

        let course_unit_id: Option<i64> = sqlx::query_scalar(
            "SELECT course_unit_id FROM catalog_entry_course_units WHERE entry_id = $1",
        )
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to load course unit"))?;

        let tags: Vec<String> = sqlx::query_scalar(
            "SELECT t.name FROM tags t \
             JOIN catalog_entry_tags et ON et.tag_id = t.id \
             WHERE et.entry_id = $1 ORDER BY t.name",
        )
        .bind(entry_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load tags"))?;

        Ok(Some(record.into_entry(course_unit_id, tags)))
    }

    async fn apply_changes(
        &self,
        entry_id: i64,
        changes: &CatalogEntryChanges,
    ) -> AppResult<Option<CatalogEntry>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let updated: Option<i64> = sqlx::query_scalar(
            "UPDATE catalog_entries SET \
             title = COALESCE($2, title), \
             description = CASE WHEN $3::boolean THEN $4::text ELSE description END, \
             repo_url = CASE WHEN $5::boolean THEN $6::text ELSE repo_url END, \
             demo_url = CASE WHEN $7::boolean THEN $8::text ELSE demo_url END, \
             cover_image_url = CASE WHEN $9::boolean THEN $10::text ELSE cover_image_url END, \
             visibility = COALESCE($11, visibility), \
             file_id = COALESCE($12, file_id), \
             updated_at = NOW() \
             WHERE id = $1 RETURNING id",
        )
        .bind(entry_id)
        .bind(&changes.title)
        .bind(changes.description.is_some())
        .bind(changes.description.clone().flatten())
        .bind(changes.repo_url.is_some())
        .bind(changes.repo_url.clone().flatten())
        .bind(changes.demo_url.is_some())
        .bind(changes.demo_url.clone().flatten())
        .bind(changes.cover_image_url.is_some())
        .bind(changes.cover_image_url.clone().flatten())
        .bind(changes.visibility)
        .bind(&changes.file_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to update catalog entry"))?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(tags) = &changes.tags {
            write_tags(&mut tx, entry_id, tags).await?;
        }
        if let Some(course_unit_id) = changes.course_unit_id {
            write_course_unit(&mut tx, entry_id, course_unit_id).await?;
        }

        tx.commit()
            .await
            .map_err(db_err("Failed to commit catalog update"))?;

        self.find_entry(entry_id).await
    }

    async fn delete_entry(&self, entry_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM catalog_entries WHERE id = $1")
            .bind(entry_id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete catalog entry"))?;
        Ok(result.rows_affected() > 0)
    }
}
