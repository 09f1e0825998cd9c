//! Recorded state machine for a single catalog write.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use projecthub_core::error::AppError;
use projecthub_entity::catalog::CatalogEntry;
use projecthub_entity::saga::{SagaKind, SagaState};

/// One step of a saga.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SagaTransition {
    pub from: SagaState,
    pub to: SagaState,
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// The result of a saga that reached `Committed`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SagaOutcome {
    pub saga_id: Uuid,
    pub entry: CatalogEntry,
    pub transitions: Vec<SagaTransition>,
}

/// Tracks the current state of a saga and every transition taken.
///
/// Each transition is emitted as a structured log event so a run can be
/// reconstructed from logs alone.
#[derive(Debug)]
pub struct SagaLog {
    id: Uuid,
    kind: SagaKind,
    state: SagaState,
    transitions: Vec<SagaTransition>,
}

impl SagaLog {
    /// Start a saga in `Draft`.
    pub fn start(kind: SagaKind) -> Self {
        let id = Uuid::new_v4();
        info!(saga_id = %id, kind = %kind, "Catalog saga started");
        Self {
            id,
            kind,
            state: SagaState::Draft,
            transitions: Vec::new(),
        }
    }

    /// The saga run id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The current state.
    pub fn state(&self) -> SagaState {
        self.state
    }

    /// Transitions taken so far.
    pub fn transitions(&self) -> &[SagaTransition] {
        &self.transitions
    }

    /// Move to `to`, rejecting edges outside the diagram.
    pub fn advance(&mut self, to: SagaState, detail: Option<String>) -> Result<(), AppError> {
        let from = self.state;
        if !from.can_transition_to(to, self.kind) {
            return Err(AppError::internal(format!(
                "Illegal {} saga transition {from} -> {to}",
                self.kind
            )));
        }

        info!(
            saga_id = %self.id,
            kind = %self.kind,
            from = %from,
            to = %to,
            detail = detail.as_deref().unwrap_or(""),
            "Catalog saga transition"
        );

        self.state = to;
        self.transitions.push(SagaTransition {
            from,
            to,
            at: Utc::now(),
            detail,
        });
        Ok(())
    }

    /// Close a committed saga with the resulting entry.
    pub fn finish(self, entry: CatalogEntry) -> SagaOutcome {
        SagaOutcome {
            saga_id: self.id,
            entry,
            transitions: self.transitions,
        }
    }
}
