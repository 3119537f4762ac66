//! Event Store module
//!
//! Persistence layer for Event Sourcing.
//! Events are kept in process memory behind an async read/write lock.

mod error;
mod repository;

pub use error::EventStoreError;
pub use repository::{AggregateOperation, EventStore, StoredEvent};
