//! Catalog entry writes spanning the local store and the files service.
//!
//! There is no shared transaction with the files service. Create inserts
//! the row first and deletes it again if anything inside the compensation
//! boundary fails; update calls the files service before writing anything.
//! A crash between a successful attach and the local `file_id` write leaves
//! the two sides disagreeing; that window is logged, not reconciled.

use std::sync::Arc;

use tracing::{error, info, warn};

use projecthub_core::error::{AppError, ErrorKind};
use projecthub_database::CatalogStore;
use projecthub_entity::catalog::CatalogEntry;
use projecthub_entity::saga::{SagaKind, SagaState};

use super::attach::FileAttacher;
use super::saga::{SagaLog, SagaOutcome};
use super::validation::{self, CreateCatalogEntry, UpdateCatalogEntry};
use crate::context::RequestContext;

/// Runs catalog writes as recorded sagas.
#[derive(Clone)]
pub struct SagaCoordinator {
    store: Arc<dyn CatalogStore>,
    attacher: Arc<dyn FileAttacher>,
}

impl std::fmt::Debug for SagaCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SagaCoordinator").finish_non_exhaustive()
    }
}

impl SagaCoordinator {
    /// Creates a new coordinator.
    pub fn new(store: Arc<dyn CatalogStore>, attacher: Arc<dyn FileAttacher>) -> Self {
        Self { store, attacher }
    }

    /// Fetch an entry. No ownership is required to read.
    pub async fn get(&self, entry_id: i64) -> Result<CatalogEntry, AppError> {
        self.store
            .find_entry(entry_id)
            .await?
            .ok_or_else(|| AppError::not_found("Catalog entry not found"))
    }

    /// Create an entry and attach its file.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateCatalogEntry,
    ) -> Result<SagaOutcome, AppError> {
        let draft = validation::validate_create(req, ctx.user_id())?;
        let credential = ctx.require_credential()?;

        let mut saga = SagaLog::start(SagaKind::Create);
        let record = self.store.insert_entry(&draft.entry).await?;
        let entry_id = record.id;
        saga.advance(SagaState::Persisted, Some(format!("entry {entry_id}")))?;

        if let Err(e) = self.write_metadata(entry_id, &draft.tags, draft.course_unit_id).await {
            self.compensate(&mut saga, entry_id, &format!("metadata write failed: {e}"))
                .await;
            return Err(AppError::with_source(
                ErrorKind::Internal,
                "Failed to store catalog entry metadata",
                e,
            ));
        }

        if let Err(e) = self
            .attacher
            .attach(&draft.file_id, entry_id, credential)
            .await
        {
            warn!(
                saga_id = %saga.id(),
                entry_id,
                file_id = %draft.file_id,
                error = %e,
                "File attach failed"
            );
            self.compensate(&mut saga, entry_id, &e.to_string()).await;
            return Err(AppError::upstream(e));
        }
        saga.advance(SagaState::Attached, Some(draft.file_id.clone()))?;

        self.record_file_ref(&saga, entry_id, &draft.file_id).await?;
        saga.advance(SagaState::Committed, None)?;

        let entry = self.get(entry_id).await?;
        info!(
            saga_id = %saga.id(),
            entry_id,
            user_id = %ctx.user_id(),
            "Catalog entry created"
        );
        Ok(saga.finish(entry))
    }

    /// Update an entry. A new file is attached before any local write.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        entry_id: i64,
        req: UpdateCatalogEntry,
    ) -> Result<SagaOutcome, AppError> {
        let changes = validation::validate_update(req)?;

        let existing = self.get(entry_id).await?;
        ensure_owner(ctx, &existing)?;

        let mut saga = SagaLog::start(SagaKind::Update);
        if let Some(file_id) = changes.file_id.as_deref() {
            let credential = ctx.require_credential()?;
            if let Err(e) = self.attacher.attach(file_id, entry_id, credential).await {
                warn!(
                    saga_id = %saga.id(),
                    entry_id,
                    file_id,
                    error = %e,
                    "File attach failed; entry left unchanged"
                );
                return Err(AppError::upstream(e));
            }
            saga.advance(SagaState::Attached, Some(file_id.to_string()))?;
        }

        let failure = match self.store.apply_changes(entry_id, &changes).await {
            Ok(Some(entry)) => {
                saga.advance(SagaState::Committed, None)?;
                info!(
                    saga_id = %saga.id(),
                    entry_id,
                    user_id = %ctx.user_id(),
                    "Catalog entry updated"
                );
                return Ok(saga.finish(entry));
            }
            Ok(None) => AppError::not_found("Catalog entry not found"),
            Err(e) => e,
        };
        if saga.state() == SagaState::Attached {
            error!(
                saga_id = %saga.id(),
                entry_id,
                error = %failure,
                "Unreconciled attachment: file attached remotely but entry not updated"
            );
        }
        Err(failure)
    }

    /// Delete an entry. The files service is not told.
    pub async fn delete(&self, ctx: &RequestContext, entry_id: i64) -> Result<(), AppError> {
        let existing = self.get(entry_id).await?;
        ensure_owner(ctx, &existing)?;

        if !self.store.delete_entry(entry_id).await? {
            return Err(AppError::not_found("Catalog entry not found"));
        }

        info!(entry_id, user_id = %ctx.user_id(), "Catalog entry deleted");
        Ok(())
    }

    async fn write_metadata(
        &self,
        entry_id: i64,
        tags: &[String],
        course_unit_id: Option<i64>,
    ) -> Result<(), AppError> {
        if !tags.is_empty() {
            self.store.replace_tags(entry_id, tags).await?;
        }
        self.store
            .replace_course_unit(entry_id, course_unit_id)
            .await
    }

    async fn record_file_ref(
        &self,
        saga: &SagaLog,
        entry_id: i64,
        file_id: &str,
    ) -> Result<(), AppError> {
        let failure = match self.store.set_file_ref(entry_id, file_id).await {
            Ok(true) => return Ok(()),
            Ok(false) => AppError::internal("Catalog entry disappeared before its file was recorded"),
            Err(e) => AppError::with_source(ErrorKind::Internal, "Failed to record attached file", e),
        };
        error!(
            saga_id = %saga.id(),
            entry_id,
            file_id,
            error = %failure,
            "Unreconciled attachment: file attached remotely but not recorded locally"
        );
        Err(failure)
    }

    /// Delete the row inserted by a create. Failures are logged only; the
    /// caller still sees the original error.
    async fn compensate(&self, saga: &mut SagaLog, entry_id: i64, reason: &str) {
        match self.store.delete_entry(entry_id).await {
            Ok(_) => {
                if let Err(e) = saga.advance(SagaState::RolledBack, Some(reason.to_string())) {
                    error!(saga_id = %saga.id(), error = %e, "Saga rollback not recorded");
                }
            }
            Err(e) => {
                error!(
                    saga_id = %saga.id(),
                    entry_id,
                    error = %e,
                    "Compensating delete failed; entry left without a file"
                );
            }
        }
    }
}

fn ensure_owner(ctx: &RequestContext, entry: &CatalogEntry) -> Result<(), AppError> {
    if entry.is_owned_by(ctx.user_id()) {
        Ok(())
    } else {
        Err(AppError::forbidden("Only the creator may modify this entry"))
    }
}
