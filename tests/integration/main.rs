//! HTTP-level integration tests. Every test runs against in-memory stores
//! and a mocked files service, so neither PostgreSQL nor NATS is needed.

mod auth_test;
mod catalog_test;
mod helpers;
mod notification_test;
