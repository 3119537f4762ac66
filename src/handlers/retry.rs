//! Load / decide / append with conflict retry
//!
//! Shared by every handler that changes an existing product.

use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::aggregate::{Aggregate, Product};
use crate::domain::{DomainError, ProductEvent, RequestContext};
use crate::error::AppError;
use crate::event_store::{AggregateOperation, EventStore, EventStoreError};

use super::ProductUpdateResult;

/// Attempts before a conflicting write gives up
pub(crate) const MAX_RETRIES: u32 = 3;

/// Backoff step; attempt `n` waits `n * RETRY_BACKOFF`
const RETRY_BACKOFF: Duration = Duration::from_millis(10);

/// Load a product by replaying its events
pub(crate) async fn load_product(
    event_store: &EventStore,
    product_id: Uuid,
) -> Result<Product, AppError> {
    event_store
        .load_aggregate(product_id)
        .await?
        .ok_or_else(|| AppError::ProductNotFound(product_id.to_string()))
}

/// Load the product, let `decide` produce an event and append it at the
/// loaded version. On a version conflict the product is reloaded and
/// `decide` runs again against the fresh state.
pub(crate) async fn decide_and_append<F>(
    event_store: &EventStore,
    product_id: Uuid,
    context: &RequestContext,
    mut decide: F,
) -> Result<Product, AppError>
where
    F: FnMut(&Product) -> Result<ProductEvent, DomainError>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        let product = load_product(event_store, product_id).await?;
        let event = decide(&product)?;

        let operation = AggregateOperation::new(
            Product::aggregate_type(),
            product.id(),
            product.version(),
            event.event_type(),
            &event,
        )?;

        match event_store.append(operation, context).await {
            Ok(_) => return Ok(product.apply(event)),
            Err(e) if e.is_retryable() && attempt < MAX_RETRIES => {
                tracing::warn!(
                    product_id = %product_id,
                    attempt,
                    "Version conflict, retrying: {}",
                    e
                );
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
            }
            Err(e) if e.is_retryable() => {
                tracing::warn!(product_id = %product_id, "Giving up after {} attempts", attempt);
                return Err(EventStoreError::MaxRetriesExceeded.into());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Summarize a product after a change
pub(crate) fn update_result(product: &Product) -> ProductUpdateResult {
    ProductUpdateResult {
        product_id: product.id(),
        version: product.version(),
        updated_at: product.updated_at().unwrap_or_else(Utc::now),
    }
}
