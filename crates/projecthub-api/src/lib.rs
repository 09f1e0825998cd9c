//! # projecthub-api
//!
//! HTTP API layer for ProjectHub built on Axum.
//!
//! Provides the catalog and notification endpoints, the identity
//! extractor, middleware (CORS, logging), DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
