//! Notification reads for the calling user.

pub mod service;

pub use service::NotificationService;
