//! Product Aggregate
//!
//! A product owns one weekly forecast and a sparse set of recorded actuals.
//! State is derived from events; commands return the event to persist.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ActualMetric, DomainError, ProductEvent, WeekNumber, WeeklyProjection};
use crate::report::Aggregator;

use super::Aggregate;

/// Longest accepted product name
const MAX_NAME_LENGTH: usize = 200;

/// Product Aggregate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Product {
    id: Uuid,
    name: String,

    /// Week-ordered forecast, replaced wholesale
    projections: Vec<WeeklyProjection>,

    /// Recorded actuals keyed by week
    actuals: BTreeMap<WeekNumber, ActualMetric>,

    /// Number of events applied
    version: i64,

    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_input("Product name must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::invalid_input(format!(
            "Product name exceeds {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

impl Product {
    /// Create a new product and generate the creation event
    pub fn create(product_id: Uuid, name: &str) -> Result<(Self, ProductEvent), DomainError> {
        let name = validate_name(name)?;
        let now = Utc::now();

        let event = ProductEvent::ProductCreated {
            product_id,
            name: name.clone(),
            created_at: now,
        };

        let product = Self {
            id: product_id,
            name,
            projections: Vec::new(),
            actuals: BTreeMap::new(),
            version: 1,
            created_at: Some(now),
            updated_at: Some(now),
        };

        Ok((product, event))
    }

    /// Rename the product
    pub fn rename(&self, name: &str) -> Result<ProductEvent, DomainError> {
        let name = validate_name(name)?;

        Ok(ProductEvent::ProductRenamed {
            product_id: self.id,
            name,
            renamed_at: Utc::now(),
        })
    }

    /// Replace the weekly forecast.
    ///
    /// The sequence must fit the configured horizon, both in length and in
    /// its highest week number, and pass the aggregator's validation. It is
    /// stored sorted by week.
    ///
    /// # Errors
    /// - `DomainError::HorizonExceeded` if there are more weeks than the horizon allows
    /// - `DomainError::InvalidWeek` if a week number lies beyond the horizon
    /// - anything `Aggregator::validate_projections` rejects
    pub fn replace_projections(
        &self,
        mut weeks: Vec<WeeklyProjection>,
        aggregator: &Aggregator,
    ) -> Result<ProductEvent, DomainError> {
        let max = aggregator.max_horizon_weeks();
        if weeks.len() > max as usize {
            return Err(DomainError::HorizonExceeded {
                weeks: weeks.len(),
                max,
            });
        }
        for projection in &weeks {
            projection.week.within_horizon(max)?;
        }

        aggregator.validate_projections(&weeks)?;
        weeks.sort_by_key(|projection| projection.week);

        Ok(ProductEvent::ProjectionsReplaced {
            product_id: self.id,
            weeks,
            replaced_at: Utc::now(),
        })
    }

    /// Record (or overwrite) the actual for a week.
    ///
    /// Weeks without a projection are accepted; the aggregator reports them
    /// as orphan actuals rather than counting them.
    pub fn record_actual(
        &self,
        actual: ActualMetric,
        max_horizon_weeks: u32,
    ) -> Result<ProductEvent, DomainError> {
        actual.week.within_horizon(max_horizon_weeks)?;

        if actual.is_blank() {
            return Err(DomainError::invalid_input(format!(
                "Actual for week {} records no figures",
                actual.week
            )));
        }

        Ok(ProductEvent::ActualRecorded {
            product_id: self.id,
            actual,
            recorded_at: Utc::now(),
        })
    }

    /// Remove the actual recorded for a week
    pub fn remove_actual(&self, week: WeekNumber) -> Result<ProductEvent, DomainError> {
        if !self.actuals.contains_key(&week) {
            return Err(DomainError::ActualNotFound { week: week.value() });
        }

        Ok(ProductEvent::ActualRemoved {
            product_id: self.id,
            week,
            removed_at: Utc::now(),
        })
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn projections(&self) -> &[WeeklyProjection] {
        &self.projections
    }

    pub fn actuals(&self) -> &BTreeMap<WeekNumber, ActualMetric> {
        &self.actuals
    }

    pub fn actual(&self, week: WeekNumber) -> Option<&ActualMetric> {
        self.actuals.get(&week)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Aggregate for Product {
    type Event = ProductEvent;

    fn aggregate_type() -> &'static str {
        "Product"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(mut self, event: Self::Event) -> Self {
        match event {
            ProductEvent::ProductCreated {
                product_id,
                name,
                created_at,
            } => {
                self.id = product_id;
                self.name = name;
                self.projections.clear();
                self.actuals.clear();
                self.created_at = Some(created_at);
                self.updated_at = Some(created_at);
            }

            ProductEvent::ProductRenamed {
                name, renamed_at, ..
            } => {
                self.name = name;
                self.updated_at = Some(renamed_at);
            }

            ProductEvent::ProjectionsReplaced {
                weeks, replaced_at, ..
            } => {
                self.projections = weeks;
                self.updated_at = Some(replaced_at);
            }

            ProductEvent::ActualRecorded {
                actual, recorded_at, ..
            } => {
                self.actuals.insert(actual.week, actual);
                self.updated_at = Some(recorded_at);
            }

            ProductEvent::ActualRemoved {
                week, removed_at, ..
            } => {
                if self.actuals.remove(&week).is_none() {
                    tracing::error!(
                        "ActualRemoved replayed for week {} with no actual on product {}",
                        week,
                        self.id
                    );
                }
                self.updated_at = Some(removed_at);
            }
        }

        self.version += 1;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn week(n: i64) -> WeekNumber {
        WeekNumber::new(n).unwrap()
    }

    #[test]
    fn test_product_create() {
        let product_id = Uuid::new_v4();
        let (product, event) = Product::create(product_id, "  Summer Festival ").unwrap();

        assert_eq!(product.id(), product_id);
        assert_eq!(product.name(), "Summer Festival");
        assert_eq!(product.version(), 1);
        assert!(product.projections().is_empty());
        assert!(matches!(event, ProductEvent::ProductCreated { .. }));
    }

    #[test]
    fn test_product_create_rejects_blank_name() {
        let result = Product::create(Uuid::new_v4(), "   ");
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_replace_projections_sorts_weeks() {
        let (product, _) = Product::create(Uuid::new_v4(), "Expo").unwrap();
        let weeks = vec![
            WeeklyProjection::new(week(2), dec!(10), dec!(5)),
            WeeklyProjection::new(week(1), dec!(10), dec!(5)),
        ];

        let event = product
            .replace_projections(weeks, &Aggregator::new())
            .unwrap();
        let product = product.apply(event);

        let order: Vec<u32> = product.projections().iter().map(|p| p.week.value()).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(product.version(), 2);
    }

    #[test]
    fn test_replace_projections_rejects_duplicates() {
        let (product, _) = Product::create(Uuid::new_v4(), "Expo").unwrap();
        let weeks = vec![
            WeeklyProjection::new(week(1), dec!(10), dec!(5)),
            WeeklyProjection::new(week(1), dec!(12), dec!(5)),
        ];

        let result = product.replace_projections(weeks, &Aggregator::new());
        assert_eq!(result.unwrap_err(), DomainError::DuplicateWeek { week: 1 });
    }

    #[test]
    fn test_replace_projections_enforces_horizon() {
        let (product, _) = Product::create(Uuid::new_v4(), "Expo").unwrap();
        let aggregator = Aggregator::new().with_max_horizon(3);

        let four: Vec<_> = (1..=4)
            .map(|n| WeeklyProjection::new(week(n), dec!(10), dec!(5)))
            .collect();
        assert_eq!(
            product.replace_projections(four, &aggregator).unwrap_err(),
            DomainError::HorizonExceeded { weeks: 4, max: 3 }
        );

        let far = vec![WeeklyProjection::new(week(4), dec!(1), dec!(1))];
        assert!(matches!(
            product.replace_projections(far, &aggregator),
            Err(DomainError::InvalidWeek(_))
        ));

        let fits: Vec<_> = (1..=3)
            .map(|n| WeeklyProjection::new(week(n), dec!(10), dec!(5)))
            .collect();
        assert!(product.replace_projections(fits, &aggregator).is_ok());
    }

    #[test]
    fn test_replace_projections_rejects_inconsistent_profit() {
        let (product, _) = Product::create(Uuid::new_v4(), "Expo").unwrap();
        let mut weeks = vec![WeeklyProjection::new(week(1), dec!(100), dec!(150))];
        weeks[0].weekly_profit = dec!(500);

        let result = product.replace_projections(weeks, &Aggregator::new());
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_record_and_overwrite_actual() {
        let (product, _) = Product::create(Uuid::new_v4(), "Expo").unwrap();

        let event = product
            .record_actual(ActualMetric::new(week(3), dec!(50), dec!(20)), 52)
            .unwrap();
        let product = product.apply(event);

        let event = product
            .record_actual(ActualMetric::new(week(3), dec!(55), dec!(20)), 52)
            .unwrap();
        let product = product.apply(event);

        assert_eq!(product.actuals().len(), 1);
        assert_eq!(product.actual(week(3)).unwrap().revenue, Some(dec!(55)));
        assert_eq!(product.version(), 3);
    }

    #[test]
    fn test_record_actual_beyond_horizon() {
        let (product, _) = Product::create(Uuid::new_v4(), "Expo").unwrap();
        let result = product.record_actual(ActualMetric::new(week(60), dec!(1), dec!(1)), 52);
        assert!(matches!(result, Err(DomainError::InvalidWeek(_))));
    }

    #[test]
    fn test_record_actual_without_figures_rejected() {
        let (product, _) = Product::create(Uuid::new_v4(), "Expo").unwrap();
        let result = product.record_actual(ActualMetric::empty(week(1)), 52);
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_remove_actual() {
        let (product, _) = Product::create(Uuid::new_v4(), "Expo").unwrap();
        assert_eq!(
            product.remove_actual(week(1)).unwrap_err(),
            DomainError::ActualNotFound { week: 1 }
        );

        let event = product
            .record_actual(ActualMetric::new(week(1), dec!(5), dec!(1)), 52)
            .unwrap();
        let product = product.apply(event);
        let event = product.remove_actual(week(1)).unwrap();
        let product = product.apply(event);

        assert!(product.actuals().is_empty());
    }

    #[test]
    fn test_replay_from_default() {
        let product_id = Uuid::new_v4();
        let (created, created_event) = Product::create(product_id, "Tour").unwrap();
        let renamed_event = created.rename("World Tour").unwrap();

        let replayed = Product::default().apply(created_event).apply(renamed_event);

        assert_eq!(replayed.id(), product_id);
        assert_eq!(replayed.name(), "World Tour");
        assert_eq!(replayed.version(), 2);
    }
}
