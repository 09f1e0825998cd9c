//! Durable queue (NATS JetStream) configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Settings for the notification ingestion consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Whether to start the consumer at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// NATS server URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// JetStream stream name.
    #[serde(default = "default_stream")]
    pub stream: String,
    /// Subjects the stream captures.
    #[serde(default = "default_subjects")]
    pub subjects: Vec<String>,
    /// Durable consumer name; shared by every replica.
    #[serde(default = "default_durable_name")]
    pub durable_name: String,
    /// Maximum unacknowledged deliveries held at once.
    #[serde(default = "default_prefetch")]
    pub prefetch: usize,
    /// Delivery attempts before the broker gives up; `-1` means unlimited.
    #[serde(default = "default_max_deliver")]
    pub max_deliver: i64,
    /// Collapse redeliveries carrying the same `eventId` into one row.
    #[serde(default)]
    pub deduplicate: bool,
    /// How long shutdown waits for in-flight handlers, in seconds.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            url: default_url(),
            stream: default_stream(),
            subjects: default_subjects(),
            durable_name: default_durable_name(),
            prefetch: default_prefetch(),
            max_deliver: default_max_deliver(),
            deduplicate: false,
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }
}

impl QueueConfig {
    /// Reject settings the broker would refuse or that disable backpressure.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.enabled {
            return Ok(());
        }
        if self.prefetch == 0 {
            return Err(AppError::configuration("queue.prefetch must be at least 1"));
        }
        if self.subjects.iter().all(|s| s.trim().is_empty()) {
            return Err(AppError::configuration(
                "queue.subjects must contain at least one subject",
            ));
        }
        if self.stream.trim().is_empty() || self.durable_name.trim().is_empty() {
            return Err(AppError::configuration(
                "queue.stream and queue.durable_name must not be empty",
            ));
        }
        if self.max_deliver == 0 || self.max_deliver < -1 {
            return Err(AppError::configuration(
                "queue.max_deliver must be -1 (unlimited) or a positive count",
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_stream() -> String {
    "EVENTS".to_string()
}

fn default_subjects() -> Vec<String> {
    vec![
        "project.file.ready".to_string(),
        "file.uploaded".to_string(),
        "file.ready".to_string(),
    ]
}

fn default_durable_name() -> String {
    "notifications".to_string()
}

fn default_prefetch() -> usize {
    10
}

fn default_max_deliver() -> i64 {
    -1
}

fn default_shutdown_grace() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_queue_skips_validation() {
        let config = QueueConfig {
            enabled: false,
            prefetch: 0,
            ..QueueConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_deliver_zero_rejected() {
        let config = QueueConfig {
            max_deliver: 0,
            ..QueueConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
