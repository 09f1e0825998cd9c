//! Catalog write saga states.

pub mod state;

pub use state::{SagaKind, SagaState};
