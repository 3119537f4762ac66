//! Event Store Errors
//!
//! Error types for event store operations.

use uuid::Uuid;

/// Errors that can occur in the event store
#[derive(Debug, thiserror::Error)]
pub enum EventStoreError {
    /// Optimistic concurrency conflict
    #[error("Concurrency conflict for aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        aggregate_id: Uuid,
        expected: i64,
        actual: i64,
    },

    /// Aggregate stream belongs to a different aggregate type
    #[error("Aggregate {aggregate_id} is a {found}, not a {expected}")]
    AggregateTypeMismatch {
        aggregate_id: Uuid,
        expected: String,
        found: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Maximum retries exceeded
    #[error("Maximum retries exceeded for atomic operation")]
    MaxRetriesExceeded,
}

impl EventStoreError {
    /// Check if this error is a concurrency conflict
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, EventStoreError::ConcurrencyConflict { .. })
    }

    /// Check if reloading the aggregate and retrying may succeed
    pub fn is_retryable(&self) -> bool {
        self.is_concurrency_conflict()
    }
}
