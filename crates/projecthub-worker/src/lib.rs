//! # projecthub-worker
//!
//! Event ingestion for ProjectHub. A JetStream durable consumer delivers
//! upstream "file ready" events; each delivery is parsed, filtered by kind,
//! and stored as a notification before it is acknowledged.

pub mod consumer;
pub mod event;
pub mod ingest;

pub use consumer::QueueConsumer;
pub use event::{EventError, FileReadyEvent, ParsedEvent, parse_event};
pub use ingest::{Disposition, NotificationIngestor};
