//! HS256 token verification against the shared secret.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde_json::{Map, Value};
use tracing::debug;

use projecthub_core::config::AuthConfig;

use super::claims::subject_from_claims;
use crate::identity::Identity;

/// Verifies bearer tokens and extracts the subject.
///
/// The secret is bound at construction; one instance is shared by every
/// caller that needs identity resolution.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Create a verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_secret(config.jwt_secret.as_bytes(), config.leeway_seconds)
    }

    /// Create a verifier for a raw secret.
    pub fn with_secret(secret: &[u8], leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = leeway_seconds;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify signature and expiry, then extract the subject.
    ///
    /// Returns `None` on any failure; the reason is logged at debug level.
    pub fn verify(&self, token: &str) -> Option<Identity> {
        let data = match decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
        {
            Ok(data) => data,
            Err(e) => {
                debug!(error = %e, "Bearer token rejected");
                return None;
            }
        };

        let subject = subject_from_claims(&data.claims);
        if subject.is_none() {
            debug!("Bearer token carries no usable subject claim");
        }
        subject.map(Identity::new)
    }
}
