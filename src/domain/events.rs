//! Domain Events
//!
//! Event definitions for Event Sourcing.
//! Events are immutable facts about a product's forecast and its actuals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActualMetric, WeekNumber, WeeklyProjection};

/// Product-related events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProductEvent {
    /// Product was created with an empty forecast
    ProductCreated {
        product_id: Uuid,
        name: String,
        created_at: DateTime<Utc>,
    },

    /// Product was renamed
    ProductRenamed {
        product_id: Uuid,
        name: String,
        renamed_at: DateTime<Utc>,
    },

    /// The weekly forecast was replaced wholesale (already sorted by week)
    ProjectionsReplaced {
        product_id: Uuid,
        weeks: Vec<WeeklyProjection>,
        replaced_at: DateTime<Utc>,
    },

    /// An actual was recorded for a week, replacing any earlier one
    ActualRecorded {
        product_id: Uuid,
        actual: ActualMetric,
        recorded_at: DateTime<Utc>,
    },

    /// The actual for a week was removed
    ActualRemoved {
        product_id: Uuid,
        week: WeekNumber,
        removed_at: DateTime<Utc>,
    },
}

impl ProductEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::ProductCreated { .. } => "ProductCreated",
            ProductEvent::ProductRenamed { .. } => "ProductRenamed",
            ProductEvent::ProjectionsReplaced { .. } => "ProjectionsReplaced",
            ProductEvent::ActualRecorded { .. } => "ActualRecorded",
            ProductEvent::ActualRemoved { .. } => "ActualRemoved",
        }
    }

    /// Get the product ID this event relates to
    pub fn product_id(&self) -> Uuid {
        match self {
            ProductEvent::ProductCreated { product_id, .. } => *product_id,
            ProductEvent::ProductRenamed { product_id, .. } => *product_id,
            ProductEvent::ProjectionsReplaced { product_id, .. } => *product_id,
            ProductEvent::ActualRecorded { product_id, .. } => *product_id,
            ProductEvent::ActualRemoved { product_id, .. } => *product_id,
        }
    }
}
