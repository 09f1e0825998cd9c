//! # projecthub-core
//!
//! Core crate for ProjectHub. Contains configuration schemas, the unified
//! error system, and small shared types such as pagination.
//!
//! This crate has **no** internal dependencies on other ProjectHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
