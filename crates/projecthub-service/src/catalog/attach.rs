//! Client for the files service attach operation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use projecthub_core::config::ServicesConfig;
use projecthub_core::error::{AppError, ErrorKind};

/// Why an attach call did not succeed.
#[derive(Debug, Error)]
pub enum AttachError {
    /// No response within the configured bound.
    #[error("files service did not answer within {0} ms")]
    Timeout(u64),
    /// Connection or protocol failure before a status was received.
    #[error("files service unreachable: {0}")]
    Transport(String),
    /// The files service answered with a non-success status.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
}

/// Links a remote file object to a catalog entry.
///
/// The remote side must treat a repeated attach of the same pair as a
/// success.
#[async_trait]
pub trait FileAttacher: Send + Sync + 'static {
    /// Attach `file_id` to `entry_id` on behalf of `credential`.
    async fn attach(&self, file_id: &str, entry_id: i64, credential: &str)
    -> Result<(), AttachError>;
}

/// [`FileAttacher`] calling `POST {files_url}/files/{fileId}/attach`.
#[derive(Debug, Clone)]
pub struct HttpFileAttacher {
    client: reqwest::Client,
    base_url: Url,
    timeout_ms: u64,
}

impl HttpFileAttacher {
    /// Build a client from the validated service endpoints.
    pub fn new(config: &ServicesConfig) -> Result<Self, AppError> {
        let base_url = Url::parse(config.files_base()).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid services.files_url: {e}"),
                e,
            )
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(
                "services.files_url cannot be used as a base URL",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.attach_timeout_ms))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            base_url,
            timeout_ms: config.attach_timeout_ms,
        })
    }

    fn attach_url(&self, file_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["files", file_id, "attach"]);
        }
        url
    }
}

#[async_trait]
impl FileAttacher for HttpFileAttacher {
    async fn attach(
        &self,
        file_id: &str,
        entry_id: i64,
        credential: &str,
    ) -> Result<(), AttachError> {
        let url = self.attach_url(file_id);
        debug!(%url, entry_id, "Attaching file to catalog entry");

        let response = self
            .client
            .post(url)
            .bearer_auth(credential)
            .json(&serde_json::json!({ "projectId": entry_id.to_string() }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AttachError::Timeout(self.timeout_ms)
                } else {
                    AttachError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AttachError::Rejected {
            status: status.as_u16(),
            detail: error_detail(status, &body),
        })
    }
}

/// The most specific description of a failed response: a `detail`,
/// `error`, or `message` string in a JSON body, else the raw body, else the
/// status line.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        let field = ["detail", "error", "message"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|s| !s.trim().is_empty());
        if let Some(field) = field {
            return field.to_string();
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status.to_string()
}
