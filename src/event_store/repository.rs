//! Event Store Repository
//!
//! In-process implementation of the Event Store pattern.
//! Provides atomic event appends with optimistic concurrency control.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::domain::RequestContext;

use super::EventStoreError;

/// Stored event
#[derive(Debug, Clone, Serialize)]
pub struct StoredEvent {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: Uuid,
    pub version: i64,
    pub event_type: String,
    pub event_data: serde_json::Value,
    pub context: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Operation to be performed on an aggregate
#[derive(Debug)]
pub struct AggregateOperation {
    pub aggregate_type: String,
    pub aggregate_id: Uuid,
    pub expected_version: i64,
    pub event_type: String,
    pub event_data: serde_json::Value,
}

impl AggregateOperation {
    /// Create a new aggregate operation
    pub fn new<E: Serialize>(
        aggregate_type: &str,
        aggregate_id: Uuid,
        expected_version: i64,
        event_type: &str,
        event: &E,
    ) -> Result<Self, EventStoreError> {
        let event_data = serde_json::to_value(event)?;
        Ok(Self {
            aggregate_type: aggregate_type.to_string(),
            aggregate_id,
            expected_version,
            event_type: event_type.to_string(),
            event_data,
        })
    }
}

#[derive(Debug, Default)]
struct EventLog {
    streams: HashMap<Uuid, Vec<StoredEvent>>,
    /// Stream ids in creation order, with their aggregate type
    index: Vec<(String, Uuid)>,
}

impl EventLog {
    fn current_version(&self, aggregate_id: Uuid) -> i64 {
        self.streams
            .get(&aggregate_id)
            .and_then(|events| events.last())
            .map(|event| event.version)
            .unwrap_or(0)
    }

    /// Verify expected version (optimistic locking) and stream type
    fn check(&self, op: &AggregateOperation) -> Result<(), EventStoreError> {
        let current_version = self.current_version(op.aggregate_id);
        if current_version != op.expected_version {
            return Err(EventStoreError::ConcurrencyConflict {
                aggregate_id: op.aggregate_id,
                expected: op.expected_version,
                actual: current_version,
            });
        }

        if let Some(first) = self
            .streams
            .get(&op.aggregate_id)
            .and_then(|events| events.first())
        {
            if first.aggregate_type != op.aggregate_type {
                return Err(EventStoreError::AggregateTypeMismatch {
                    aggregate_id: op.aggregate_id,
                    expected: op.aggregate_type.clone(),
                    found: first.aggregate_type.clone(),
                });
            }
        }

        Ok(())
    }

    fn push(
        &mut self,
        op: AggregateOperation,
        context: &serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Uuid {
        let event_id = Uuid::new_v4();

        if op.expected_version == 0 {
            self.index.push((op.aggregate_type.clone(), op.aggregate_id));
        }

        self.streams
            .entry(op.aggregate_id)
            .or_default()
            .push(StoredEvent {
                id: event_id,
                aggregate_type: op.aggregate_type,
                aggregate_id: op.aggregate_id,
                version: op.expected_version + 1,
                event_type: op.event_type,
                event_data: op.event_data,
                context: context.clone(),
                created_at,
            });

        event_id
    }
}

/// Event Store for persisting and retrieving events
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    log: Arc<RwLock<EventLog>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically append events across one or more aggregates.
    ///
    /// Every operation's expected version is checked before anything is
    /// written; a single mismatch rejects the whole batch. Each aggregate may
    /// appear at most once per batch.
    pub async fn append_atomic(
        &self,
        operations: Vec<AggregateOperation>,
        context: &RequestContext,
    ) -> Result<Vec<Uuid>, EventStoreError> {
        let context_json = serde_json::to_value(context)?;
        let mut log = self.log.write().await;

        for op in &operations {
            log.check(op)?;
        }

        let now = Utc::now();
        let event_ids = operations
            .into_iter()
            .map(|op| log.push(op, &context_json, now))
            .collect();

        Ok(event_ids)
    }

    /// Append a single event
    pub async fn append(
        &self,
        operation: AggregateOperation,
        context: &RequestContext,
    ) -> Result<Uuid, EventStoreError> {
        let context_json = serde_json::to_value(context)?;
        let mut log = self.log.write().await;

        log.check(&operation)?;
        Ok(log.push(operation, &context_json, Utc::now()))
    }

    /// Load an aggregate by replaying its events
    pub async fn load_aggregate<A>(&self, aggregate_id: Uuid) -> Result<Option<A>, EventStoreError>
    where
        A: Aggregate,
        A::Event: DeserializeOwned,
    {
        let events = self.get_events(aggregate_id).await;

        let Some(first) = events.first() else {
            return Ok(None);
        };

        if first.aggregate_type != A::aggregate_type() {
            return Err(EventStoreError::AggregateTypeMismatch {
                aggregate_id,
                expected: A::aggregate_type().to_string(),
                found: first.aggregate_type.clone(),
            });
        }

        let mut aggregate = A::default();
        for stored_event in events {
            let event: A::Event = serde_json::from_value(stored_event.event_data)?;
            aggregate = aggregate.apply(event);
        }

        Ok(Some(aggregate))
    }

    /// Get all events for an aggregate, oldest first
    pub async fn get_events(&self, aggregate_id: Uuid) -> Vec<StoredEvent> {
        let log = self.log.read().await;
        log.streams.get(&aggregate_id).cloned().unwrap_or_default()
    }

    /// Current version of an aggregate (0 if it has no events)
    pub async fn current_version(&self, aggregate_id: Uuid) -> i64 {
        self.log.read().await.current_version(aggregate_id)
    }

    /// Ids of every aggregate of a type, in creation order
    pub async fn list_aggregate_ids(&self, aggregate_type: &str) -> Vec<Uuid> {
        let log = self.log.read().await;
        log.index
            .iter()
            .filter(|(kind, _)| kind == aggregate_type)
            .map(|(_, id)| *id)
            .collect()
    }
}
