//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Caller identity resolution settings.
///
/// Tokens are issued by the identity service; this process only verifies
/// them against the shared secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC-SHA256 secret used to verify bearer tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Header carrying an identity already verified by the front door.
    #[serde(default = "default_trusted_header")]
    pub trusted_identity_header: String,
    /// Clock skew tolerated when checking `exp`, in seconds.
    #[serde(default)]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            trusted_identity_header: default_trusted_header(),
            leeway_seconds: 0,
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_trusted_header() -> String {
    "x-user-id".to_string()
}
