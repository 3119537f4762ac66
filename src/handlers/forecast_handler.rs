//! Forecast Handlers
//!
//! Replace weekly projections and maintain recorded actuals.

use crate::aggregate::Aggregate;
use crate::domain::RequestContext;
use crate::error::AppError;
use crate::event_store::EventStore;
use crate::report::Aggregator;

use super::retry::{decide_and_append, update_result};
use super::{
    ProductUpdateResult, RecordActualCommand, RemoveActualCommand, ReplaceProjectionsCommand,
};

// =========================================================================
// ReplaceProjectionsHandler
// =========================================================================

/// Handler for replacing a product's weekly forecast
pub struct ReplaceProjectionsHandler {
    event_store: EventStore,
    aggregator: Aggregator,
}

impl ReplaceProjectionsHandler {
    pub fn new(event_store: EventStore, aggregator: Aggregator) -> Self {
        Self {
            event_store,
            aggregator,
        }
    }

    /// Execute the replace projections command
    pub async fn execute(
        &self,
        command: ReplaceProjectionsCommand,
        context: &RequestContext,
    ) -> Result<ProductUpdateResult, AppError> {
        let week_count = command.weeks.len();

        let product = decide_and_append(&self.event_store, command.product_id, context, |product| {
            product.replace_projections(command.weeks.clone(), &self.aggregator)
        })
        .await?;

        tracing::info!(
            product_id = %product.id(),
            correlation_id = ?context.correlation_id,
            weeks = week_count,
            "Projections replaced"
        );

        Ok(update_result(&product))
    }
}

// =========================================================================
// RecordActualHandler
// =========================================================================

/// Handler for recording a week's actual figures
pub struct RecordActualHandler {
    event_store: EventStore,
    aggregator: Aggregator,
}

impl RecordActualHandler {
    pub fn new(event_store: EventStore, aggregator: Aggregator) -> Self {
        Self {
            event_store,
            aggregator,
        }
    }

    /// Execute the record actual command
    pub async fn execute(
        &self,
        command: RecordActualCommand,
        context: &RequestContext,
    ) -> Result<ProductUpdateResult, AppError> {
        let week = command.actual.week;
        let max_horizon = self.aggregator.max_horizon_weeks();

        let product = decide_and_append(&self.event_store, command.product_id, context, |product| {
            product.record_actual(command.actual.clone(), max_horizon)
        })
        .await?;

        tracing::info!(
            product_id = %product.id(),
            correlation_id = ?context.correlation_id,
            week = %week,
            "Actual recorded"
        );

        Ok(update_result(&product))
    }
}

// =========================================================================
// RemoveActualHandler
// =========================================================================

/// Handler for removing a week's actual figures
pub struct RemoveActualHandler {
    event_store: EventStore,
}

impl RemoveActualHandler {
    pub fn new(event_store: EventStore) -> Self {
        Self { event_store }
    }

    /// Execute the remove actual command
    pub async fn execute(
        &self,
        command: RemoveActualCommand,
        context: &RequestContext,
    ) -> Result<ProductUpdateResult, AppError> {
        let product = decide_and_append(&self.event_store, command.product_id, context, |product| {
            product.remove_actual(command.week)
        })
        .await?;

        tracing::info!(
            product_id = %product.id(),
            correlation_id = ?context.correlation_id,
            week = %command.week,
            "Actual removed"
        );

        Ok(update_result(&product))
    }
}
