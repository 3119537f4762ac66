//! Aggregate report types
//!
//! `AggregateReport` is the output of the `Aggregator` and the payload the
//! dashboard renders for a product's summary cards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{CostBreakdown, DomainError, RevenueBreakdown, WeekNumber};

use super::money::accumulate;

/// Revenue summed per stream. Every stream is always present, zero or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueStreamTotals {
    pub ticket: Decimal,
    pub food_beverage: Decimal,
    pub merchandise: Decimal,
    pub digital: Decimal,
}

impl RevenueStreamTotals {
    pub(crate) fn add(&mut self, breakdown: &RevenueBreakdown) -> Result<(), DomainError> {
        accumulate(&mut self.ticket, breakdown.ticket(), "ticket revenue")?;
        accumulate(&mut self.food_beverage, breakdown.food_beverage(), "food and beverage revenue")?;
        accumulate(&mut self.merchandise, breakdown.merchandise(), "merchandise revenue")?;
        accumulate(&mut self.digital, breakdown.digital(), "digital revenue")
    }

    /// `None` when the streams sum past the decimal range
    pub fn total(&self) -> Option<Decimal> {
        [self.ticket, self.food_beverage, self.merchandise, self.digital]
            .into_iter()
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }
}

/// Costs summed per category. Every category is always present, zero or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCategoryTotals {
    pub marketing: Decimal,
    pub staffing: Decimal,
    pub event: Decimal,
    pub setup: Decimal,
    pub cogs_food_beverage: Decimal,
    pub cogs_merchandise: Decimal,
}

impl CostCategoryTotals {
    pub(crate) fn add(&mut self, breakdown: &CostBreakdown) -> Result<(), DomainError> {
        accumulate(&mut self.marketing, breakdown.marketing(), "marketing costs")?;
        accumulate(&mut self.staffing, breakdown.staffing(), "staffing costs")?;
        accumulate(&mut self.event, breakdown.event(), "event costs")?;
        accumulate(&mut self.setup, breakdown.setup(), "setup costs")?;
        accumulate(
            &mut self.cogs_food_beverage,
            breakdown.cogs_food_beverage(),
            "food and beverage cost of goods",
        )?;
        accumulate(
            &mut self.cogs_merchandise,
            breakdown.cogs_merchandise(),
            "merchandise cost of goods",
        )
    }

    /// `None` when the categories sum past the decimal range
    pub fn total(&self) -> Option<Decimal> {
        [
            self.marketing,
            self.staffing,
            self.event,
            self.setup,
            self.cogs_food_beverage,
            self.cogs_merchandise,
        ]
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
    }
}

/// Totals computed from projections alone, ignoring every actual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionTotals {
    pub revenue: Decimal,
    pub costs: Decimal,
    pub profit: Decimal,
}

/// Non-fatal data quality findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationWarning {
    /// An actual was recorded for a week that has no projection; it was ignored.
    OrphanActual { week: WeekNumber },
}

impl std::fmt::Display for AggregationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationWarning::OrphanActual { week } => {
                write!(f, "Actual for week {} has no projection and was ignored", week)
            }
        }
    }
}

/// Summary of a product's forecast, adjusted by whatever actuals exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Number of projected weeks (N)
    pub week_count: usize,
    /// Projected weeks that also have an actual
    pub weeks_with_actuals: usize,

    // Actual-adjusted totals
    pub total_revenue: Decimal,
    pub total_costs: Decimal,
    pub total_profit: Decimal,
    /// `total_profit / total_revenue`, zero when there is no revenue
    pub profit_margin: Decimal,

    /// First 1-based position with strictly positive cumulative profit, or N + 1
    pub break_even_week: u32,

    pub revenue_stream_totals: RevenueStreamTotals,
    pub cost_category_totals: CostCategoryTotals,

    pub original_projection_totals: ProjectionTotals,
    pub variance_revenue: Decimal,
    pub variance_profit: Decimal,

    /// Share of projected weeks with an actual, in [0, 100]
    pub actuals_coverage_percent: Decimal,

    pub warnings: Vec<AggregationWarning>,
}

impl AggregateReport {
    /// A zeroed report for a product without projections.
    pub fn empty() -> Self {
        Self {
            week_count: 0,
            weeks_with_actuals: 0,
            total_revenue: Decimal::ZERO,
            total_costs: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            profit_margin: Decimal::ZERO,
            break_even_week: 1,
            revenue_stream_totals: RevenueStreamTotals::default(),
            cost_category_totals: CostCategoryTotals::default(),
            original_projection_totals: ProjectionTotals::default(),
            variance_revenue: Decimal::ZERO,
            variance_profit: Decimal::ZERO,
            actuals_coverage_percent: Decimal::ZERO,
            warnings: Vec::new(),
        }
    }

    /// False when the break-even week is the "beyond the forecast window" sentinel.
    pub fn breaks_even_within_horizon(&self) -> bool {
        (self.break_even_week as usize) <= self.week_count
    }
}

impl Default for AggregateReport {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_report_sentinel() {
        let report = AggregateReport::empty();
        assert_eq!(report.break_even_week, 1);
        assert!(!report.breaks_even_within_horizon());
    }

    #[test]
    fn test_stream_totals_add_treats_missing_as_zero() {
        let mut totals = RevenueStreamTotals::default();
        totals
            .add(&RevenueBreakdown {
                merchandise: Some(dec!(12.50)),
                ..Default::default()
            })
            .unwrap();
        totals.add(&RevenueBreakdown::default()).unwrap();

        assert_eq!(totals.merchandise, dec!(12.50));
        assert_eq!(totals.ticket, Decimal::ZERO);
        assert_eq!(totals.total(), Some(dec!(12.50)));
    }

    #[test]
    fn test_category_totals_overflow_is_an_error() {
        let mut totals = CostCategoryTotals::default();
        let staffing = CostBreakdown {
            staffing: Some(Decimal::MAX),
            ..Default::default()
        };
        totals.add(&staffing).unwrap();

        assert_eq!(
            totals.add(&staffing),
            Err(DomainError::AmountOverflow { field: "staffing costs" })
        );
        assert_eq!(totals.staffing, Decimal::MAX);
    }

    #[test]
    fn test_zero_categories_are_serialized() {
        let json = serde_json::to_value(CostCategoryTotals::default()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 6);
        assert!(object.contains_key("cogs_merchandise"));
    }

    #[test]
    fn test_warning_serialization() {
        let warning = AggregationWarning::OrphanActual {
            week: WeekNumber::new(99).unwrap(),
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert_eq!(json, r#"{"kind":"orphan_actual","week":99}"#);
        assert!(warning.to_string().contains("week 99"));
    }
}
