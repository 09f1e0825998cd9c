//! State machine for catalog writes that span the local store and the
//! remote files service.
//!
//! Create:
//!
//! ```text
//! Draft -> Persisted -> Attached -> Committed
//!              |
//!              +-> RolledBack
//! ```
//!
//! Update attaches before writing anything locally, so it skips
//! `Persisted`: `Draft -> Attached -> Committed`, or `Draft -> Committed`
//! when no file reference changes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which write the saga is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SagaKind {
    Create,
    Update,
}

impl SagaKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for SagaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of a catalog write within its saga.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SagaState {
    /// Validated, nothing written.
    Draft,
    /// Row inserted without a file reference. Compensation boundary.
    Persisted,
    /// The files service accepted the attach.
    Attached,
    /// File reference recorded locally.
    Committed,
    /// The inserted row was deleted after a failure.
    RolledBack,
}

impl SagaState {
    /// Check whether `self -> next` is an edge of the diagram for `kind`.
    pub fn can_transition_to(&self, next: SagaState, kind: SagaKind) -> bool {
        use SagaState::*;
        match kind {
            SagaKind::Create => matches!(
                (self, next),
                (Draft, Persisted)
                    | (Persisted, Attached)
                    | (Persisted, RolledBack)
                    | (Attached, Committed)
            ),
            SagaKind::Update => matches!(
                (self, next),
                (Draft, Attached) | (Draft, Committed) | (Attached, Committed)
            ),
        }
    }

    /// Return the state as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Persisted => "persisted",
            Self::Attached => "attached",
            Self::Committed => "committed",
            Self::RolledBack => "rolled_back",
        }
    }
}

impl fmt::Display for SagaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
