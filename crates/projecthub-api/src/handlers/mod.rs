//! HTTP request handlers, one module per resource.

pub mod catalog;
pub mod notification;
