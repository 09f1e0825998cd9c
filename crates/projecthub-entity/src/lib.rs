//! # projecthub-entity
//!
//! Domain entity models for ProjectHub. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! additionally derive `sqlx::FromRow`.

pub mod catalog;
pub mod notification;
pub mod saga;
