//! Catalog entry visibility.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who may see a catalog entry in listings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "catalog_visibility", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    /// Listed for everyone.
    #[default]
    Public,
    /// Listed for the creator only.
    Private,
}

impl Visibility {
    /// Return the visibility as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
