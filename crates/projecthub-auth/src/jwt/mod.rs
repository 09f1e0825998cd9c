//! Bearer token verification.

pub mod claims;
pub mod verifier;

pub use claims::{SUBJECT_CLAIMS, subject_from_claims};
pub use verifier::TokenVerifier;
