//! Caller identity.

pub mod resolver;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use resolver::{IdentityResolver, ResolvedIdentity, bearer_token};

/// Opaque caller identity. Lives only as long as the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap a raw identity value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw identity value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
