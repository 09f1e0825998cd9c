//! Core type definitions used across the ProjectHub workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
