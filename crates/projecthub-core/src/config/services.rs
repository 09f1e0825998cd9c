//! Remote service endpoints.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Endpoints of the services this process calls synchronously.
///
/// Resolved once at startup and injected; nothing looks endpoints up by
/// name at request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Base URL of the files service (owner of uploaded file objects).
    pub files_url: String,
    /// Upper bound on a single attach call, in milliseconds.
    #[serde(default = "default_attach_timeout")]
    pub attach_timeout_ms: u64,
}

impl ServicesConfig {
    /// Reject endpoints that cannot possibly work.
    pub fn validate(&self) -> Result<(), AppError> {
        let url = self.files_url.trim();
        if url.is_empty() {
            return Err(AppError::configuration("services.files_url must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::configuration(format!(
                "services.files_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.attach_timeout_ms == 0 {
            return Err(AppError::configuration(
                "services.attach_timeout_ms must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn files_base(&self) -> &str {
        self.files_url.trim().trim_end_matches('/')
    }
}

fn default_attach_timeout() -> u64 {
    5000
}
