//! Request context carrying the resolved caller.

use projecthub_auth::{Identity, ResolvedIdentity};
use projecthub_core::error::AppError;

/// Context for the current authenticated request.
///
/// Built by the HTTP extractor and passed into service methods so that
/// every operation knows who is acting and which credential to forward.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The acting identity.
    pub identity: Identity,
    /// Bearer credential forwarded on remote calls.
    pub credential: Option<String>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(identity: Identity, credential: Option<String>) -> Self {
        Self {
            identity,
            credential,
        }
    }

    /// The acting identity as a string.
    pub fn user_id(&self) -> &str {
        self.identity.as_str()
    }

    /// The credential to forward, or `Unauthenticated` if there is none.
    pub fn require_credential(&self) -> Result<&str, AppError> {
        self.credential
            .as_deref()
            .ok_or_else(|| AppError::unauthenticated("Not authenticated"))
    }
}

impl From<ResolvedIdentity> for RequestContext {
    fn from(resolved: ResolvedIdentity) -> Self {
        Self::new(resolved.identity, resolved.credential)
    }
}
