//! Product Handlers
//!
//! Create and rename products.

use chrono::Utc;

use crate::aggregate::{Aggregate, Product};
use crate::domain::RequestContext;
use crate::error::AppError;
use crate::event_store::{AggregateOperation, EventStore};

use super::retry::{decide_and_append, update_result};
use super::{CreateProductCommand, CreateProductResult, ProductUpdateResult, RenameProductCommand};

// =========================================================================
// CreateProductHandler
// =========================================================================

/// Handler for product creation
pub struct CreateProductHandler {
    event_store: EventStore,
}

impl CreateProductHandler {
    pub fn new(event_store: EventStore) -> Self {
        Self { event_store }
    }

    /// Execute the create product command
    pub async fn execute(
        &self,
        command: CreateProductCommand,
        context: &RequestContext,
    ) -> Result<CreateProductResult, AppError> {
        let (product, event) = Product::create(command.product_id, &command.name)?;

        // A fresh stream must still be empty
        let operation = AggregateOperation::new(
            Product::aggregate_type(),
            product.id(),
            0,
            event.event_type(),
            &event,
        )?;

        self.event_store.append(operation, context).await?;

        tracing::info!(
            product_id = %product.id(),
            correlation_id = ?context.correlation_id,
            "Product created"
        );

        Ok(CreateProductResult {
            product_id: product.id(),
            name: product.name().to_string(),
            created_at: product.created_at().unwrap_or_else(Utc::now),
        })
    }
}

// =========================================================================
// RenameProductHandler
// =========================================================================

/// Handler for product renames
pub struct RenameProductHandler {
    event_store: EventStore,
}

impl RenameProductHandler {
    pub fn new(event_store: EventStore) -> Self {
        Self { event_store }
    }

    /// Execute the rename command
    pub async fn execute(
        &self,
        command: RenameProductCommand,
        context: &RequestContext,
    ) -> Result<ProductUpdateResult, AppError> {
        let product = decide_and_append(&self.event_store, command.product_id, context, |product| {
            product.rename(&command.name)
        })
        .await?;

        tracing::info!(
            product_id = %product.id(),
            correlation_id = ?context.correlation_id,
            name = %product.name(),
            "Product renamed"
        );

        Ok(update_result(&product))
    }
}
