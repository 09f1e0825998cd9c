//! JetStream durable consumer driving the [`NotificationIngestor`].

use std::sync::Arc;
use std::time::Duration;

use async_nats::jetstream::{self, AckKind, consumer::PullConsumer};
use futures::StreamExt;
use tokio::sync::{Semaphore, watch};
use tracing::{debug, error, info, warn};

use projecthub_core::config::QueueConfig;
use projecthub_core::error::AppError;

use crate::ingest::{Disposition, NotificationIngestor};

/// Pulls deliveries from the durable consumer and hands each to the
/// ingestor.
///
/// At most `prefetch` deliveries are unacknowledged at once: the broker
/// enforces it through `max_ack_pending`, and a local semaphore of the same
/// size keeps handlers from outrunning it.
pub struct QueueConsumer {
    config: QueueConfig,
    consumer: PullConsumer,
    ingestor: Arc<NotificationIngestor>,
}

impl std::fmt::Debug for QueueConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueConsumer")
            .field("stream", &self.config.stream)
            .field("durable_name", &self.config.durable_name)
            .finish_non_exhaustive()
    }
}

impl QueueConsumer {
    /// Connect to NATS and make sure the stream and durable consumer exist.
    pub async fn connect(
        config: QueueConfig,
        ingestor: Arc<NotificationIngestor>,
    ) -> Result<Self, AppError> {
        info!(url = %config.url, stream = %config.stream, "Connecting to NATS");
        let client = async_nats::connect(&config.url)
            .await
            .map_err(|e| AppError::queue(format!("Failed to connect to NATS: {e}")))?;
        let jetstream = jetstream::new(client);

        let stream = jetstream
            .get_or_create_stream(jetstream::stream::Config {
                name: config.stream.clone(),
                subjects: config.subjects.clone(),
                ..Default::default()
            })
            .await
            .map_err(|e| AppError::queue(format!("Failed to create stream: {e}")))?;

        let consumer: PullConsumer = stream
            .get_or_create_consumer(
                &config.durable_name,
                jetstream::consumer::pull::Config {
                    durable_name: Some(config.durable_name.clone()),
                    ack_policy: jetstream::consumer::AckPolicy::Explicit,
                    max_ack_pending: i64::try_from(config.prefetch).unwrap_or(i64::MAX),
                    max_deliver: config.max_deliver,
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| AppError::queue(format!("Failed to create consumer: {e}")))?;

        info!(
            stream = %config.stream,
            consumer = %config.durable_name,
            prefetch = config.prefetch,
            subjects = ?config.subjects,
            "Queue consumer ready"
        );

        Ok(Self {
            config,
            consumer,
            ingestor,
        })
    }

    /// Consume until `cancel` flips to `true`, then wait for in-flight
    /// handlers up to the configured grace period.
    pub async fn run(self, mut cancel: watch::Receiver<bool>) -> Result<(), AppError> {
        let mut messages = self
            .consumer
            .messages()
            .await
            .map_err(|e| AppError::queue(format!("Failed to open message stream: {e}")))?;

        let slots = self.config.prefetch.max(1);
        let semaphore = Arc::new(Semaphore::new(slots));

        loop {
            let permit = tokio::select! {
                _ = cancel.wait_for(|stop| *stop) => break,
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let next = tokio::select! {
                _ = cancel.wait_for(|stop| *stop) => break,
                next = messages.next() => next,
            };

            let message = match next {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    warn!(error = %e, "Error receiving delivery");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
                None => {
                    warn!("Message stream closed by the server");
                    break;
                }
            };

            let ingestor = Arc::clone(&self.ingestor);
            tokio::spawn(async move {
                let _permit = permit;
                let subject = message.subject.to_string();
                debug!(%subject, "Delivery received");

                let result = match ingestor.handle(&subject, &message.payload).await {
                    Disposition::Ack => message.ack().await,
                    Disposition::Requeue => message.ack_with(AckKind::Nak(None)).await,
                };
                if let Err(e) = result {
                    error!(%subject, error = %e, "Failed to settle delivery");
                }
            });
        }

        info!("Queue consumer stopping; waiting for in-flight deliveries");
        let grace = Duration::from_secs(self.config.shutdown_grace_seconds);
        let all = u32::try_from(slots).unwrap_or(u32::MAX);
        if tokio::time::timeout(grace, semaphore.acquire_many(all))
            .await
            .is_err()
        {
            warn!("Grace period elapsed with deliveries still in flight");
        }
        info!("Queue consumer stopped");
        Ok(())
    }
}
