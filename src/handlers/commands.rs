//! Command definitions
//!
//! Commands represent intentions to change the system state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ActualMetric, WeekNumber, WeeklyProjection};

// =========================================================================
// CreateProductCommand
// =========================================================================

/// Command to create a new product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductCommand {
    pub product_id: Uuid,
    pub name: String,
}

impl CreateProductCommand {
    /// New product with a freshly generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            product_id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    pub fn with_product_id(mut self, product_id: Uuid) -> Self {
        self.product_id = product_id;
        self
    }
}

/// Result of a successful product creation
#[derive(Debug, Clone, Serialize)]
pub struct CreateProductResult {
    pub product_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// =========================================================================
// RenameProductCommand
// =========================================================================

/// Command to rename a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameProductCommand {
    pub product_id: Uuid,
    pub name: String,
}

impl RenameProductCommand {
    pub fn new(product_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            product_id,
            name: name.into(),
        }
    }
}

// =========================================================================
// ReplaceProjectionsCommand
// =========================================================================

/// Command to replace a product's weekly forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceProjectionsCommand {
    pub product_id: Uuid,
    pub weeks: Vec<WeeklyProjection>,
}

impl ReplaceProjectionsCommand {
    pub fn new(product_id: Uuid, weeks: Vec<WeeklyProjection>) -> Self {
        Self { product_id, weeks }
    }
}

// =========================================================================
// RecordActualCommand / RemoveActualCommand
// =========================================================================

/// Command to record (or overwrite) the actual figures for a week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordActualCommand {
    pub product_id: Uuid,
    pub actual: ActualMetric,
}

impl RecordActualCommand {
    pub fn new(product_id: Uuid, actual: ActualMetric) -> Self {
        Self { product_id, actual }
    }
}

/// Command to remove the actual recorded for a week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveActualCommand {
    pub product_id: Uuid,
    pub week: WeekNumber,
}

impl RemoveActualCommand {
    pub fn new(product_id: Uuid, week: WeekNumber) -> Self {
        Self { product_id, week }
    }
}

/// Result of any command that changes an existing product
#[derive(Debug, Clone, Serialize)]
pub struct ProductUpdateResult {
    pub product_id: Uuid,
    /// Product version after the change
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}
