//! # projecthub-auth
//!
//! Caller identity for ProjectHub. Tokens are issued elsewhere; this crate
//! only verifies them and derives the acting identity from a request's
//! headers.

pub mod identity;
pub mod jwt;

pub use identity::{Identity, IdentityResolver, ResolvedIdentity};
pub use jwt::TokenVerifier;
