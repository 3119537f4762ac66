//! Projection Aggregator
//!
//! Folds a product's weekly projections and recorded actuals into an
//! `AggregateReport`. Actuals win over projections for every week they cover;
//! projection-only totals are kept alongside for variance reporting.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    ActualMetric, CostBreakdown, DomainError, RevenueBreakdown, WeekNumber, WeeklyProjection,
    DEFAULT_MAX_HORIZON_WEEKS,
};

use super::money;
use super::quarterly::{self, QuarterSummary};
use super::summary::{
    AggregateReport, AggregationWarning, CostCategoryTotals, ProjectionTotals,
    RevenueStreamTotals,
};
use super::weekly::{self, WeeklyRow};

/// Default quarter length in weeks
pub const DEFAULT_WEEKS_PER_QUARTER: u32 = 13;

/// Where a week's effective figures come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekSource {
    /// No actual recorded
    Projected,
    /// Actual recorded with both revenue and expenses
    Actual,
    /// Actual recorded with only one of revenue or expenses
    Partial,
}

/// Effective figures for one projected week.
#[derive(Debug, Clone)]
pub(crate) struct WeekFigures<'a> {
    pub projection: &'a WeeklyProjection,
    pub source: WeekSource,
    pub revenue: Decimal,
    pub costs: Decimal,
    pub profit: Decimal,
    pub revenue_streams: &'a RevenueBreakdown,
    pub cost_categories: &'a CostBreakdown,
}

impl<'a> WeekFigures<'a> {
    /// Combine a projection with the actual recorded for its week, if any.
    ///
    /// A missing actual total falls back to the projected total for that
    /// stream. Breakdowns come from the actual when one exists.
    pub(crate) fn resolve(
        projection: &'a WeeklyProjection,
        actual: Option<&'a ActualMetric>,
    ) -> Result<Self, DomainError> {
        let figures = match actual {
            None => Self {
                projection,
                source: WeekSource::Projected,
                revenue: projection.total_revenue,
                costs: projection.total_costs,
                profit: projection.weekly_profit,
                revenue_streams: &projection.revenue,
                cost_categories: &projection.costs,
            },
            Some(actual) => {
                let revenue = actual.revenue.unwrap_or(projection.total_revenue);
                let costs = actual.expenses.unwrap_or(projection.total_costs);
                let source = if actual.is_complete() {
                    WeekSource::Actual
                } else {
                    WeekSource::Partial
                };

                Self {
                    projection,
                    source,
                    revenue,
                    costs,
                    profit: money::sub(revenue, costs, "actual weekly profit")?,
                    revenue_streams: &actual.revenue_breakdown,
                    cost_categories: &actual.cost_breakdown,
                }
            }
        };

        Ok(figures)
    }

    pub(crate) fn has_actual(&self) -> bool {
        self.source != WeekSource::Projected
    }
}

/// A validated, week-ordered view over a product's data.
#[derive(Debug)]
pub(crate) struct PreparedWeeks<'a> {
    pub weeks: Vec<WeekFigures<'a>>,
    pub warnings: Vec<AggregationWarning>,
}

/// Stateless calculator for actual-adjusted projection metrics.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    max_horizon_weeks: u32,
    weeks_per_quarter: u32,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            max_horizon_weeks: DEFAULT_MAX_HORIZON_WEEKS,
            weeks_per_quarter: DEFAULT_WEEKS_PER_QUARTER,
        }
    }
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of projected weeks (and the highest week number) a
    /// product accepts. Aggregation itself is not bounded by it.
    pub fn with_max_horizon(mut self, max_horizon_weeks: u32) -> Self {
        self.max_horizon_weeks = max_horizon_weeks;
        self
    }

    pub fn with_weeks_per_quarter(mut self, weeks_per_quarter: u32) -> Self {
        self.weeks_per_quarter = weeks_per_quarter.max(1);
        self
    }

    pub fn max_horizon_weeks(&self) -> u32 {
        self.max_horizon_weeks
    }

    pub fn weeks_per_quarter(&self) -> u32 {
        self.weeks_per_quarter
    }

    /// Validate a projection sequence without aggregating it.
    ///
    /// # Errors
    /// - `DomainError::DuplicateWeek` if a week number appears twice
    /// - `DomainError::InvalidInput` if a week's `weekly_profit` differs from
    ///   `total_revenue - total_costs`
    /// - `DomainError::AmountOverflow` if that difference leaves the decimal range
    pub fn validate_projections(&self, projections: &[WeeklyProjection]) -> Result<(), DomainError> {
        self.sorted(projections).map(|_| ())
    }

    /// Compute the aggregate report.
    ///
    /// # Arguments
    ///
    /// * `projections` - Weekly forecast, ideally ordered by week; sorted here if not.
    /// * `actuals` - Recorded actuals keyed by week. May be empty.
    pub fn aggregate(
        &self,
        projections: &[WeeklyProjection],
        actuals: &BTreeMap<WeekNumber, ActualMetric>,
    ) -> Result<AggregateReport, DomainError> {
        let prepared = self.prepare(projections, actuals)?;
        let week_count = prepared.weeks.len();

        let mut report = AggregateReport::empty();
        report.week_count = week_count;

        self.accumulate_totals(&prepared.weeks, &mut report)?;
        report.break_even_week = break_even_week(&prepared.weeks)?;

        report.variance_revenue = money::sub(
            report.total_revenue,
            report.original_projection_totals.revenue,
            "revenue variance",
        )?;
        report.variance_profit = money::sub(
            report.total_profit,
            report.original_projection_totals.profit,
            "profit variance",
        )?;

        if !report.total_revenue.is_zero() {
            report.profit_margin =
                money::div(report.total_profit, report.total_revenue, "profit margin")?;
        }

        if week_count > 0 {
            report.actuals_coverage_percent = Decimal::from(report.weeks_with_actuals as u64)
                * Decimal::ONE_HUNDRED
                / Decimal::from(week_count as u64);
        }

        report.warnings = prepared.warnings;

        tracing::debug!(
            weeks = week_count,
            weeks_with_actuals = report.weeks_with_actuals,
            break_even_week = report.break_even_week,
            warnings = report.warnings.len(),
            "Aggregated projections"
        );

        Ok(report)
    }

    /// Per-week rows with cumulative profit, for tables and charts.
    pub fn weekly_rows(
        &self,
        projections: &[WeeklyProjection],
        actuals: &BTreeMap<WeekNumber, ActualMetric>,
    ) -> Result<Vec<WeeklyRow>, DomainError> {
        let prepared = self.prepare(projections, actuals)?;
        weekly::build_rows(&prepared.weeks)
    }

    /// Totals grouped by quarter.
    pub fn quarterly_rollup(
        &self,
        projections: &[WeeklyProjection],
        actuals: &BTreeMap<WeekNumber, ActualMetric>,
    ) -> Result<Vec<QuarterSummary>, DomainError> {
        let prepared = self.prepare(projections, actuals)?;
        quarterly::rollup(&prepared.weeks, self.weeks_per_quarter)
    }

    /// Validate, order by week and resolve each week's effective figures.
    pub(crate) fn prepare<'a>(
        &self,
        projections: &'a [WeeklyProjection],
        actuals: &'a BTreeMap<WeekNumber, ActualMetric>,
    ) -> Result<PreparedWeeks<'a>, DomainError> {
        let ordered = self.sorted(projections)?;

        for (week, actual) in actuals {
            if actual.week != *week {
                return Err(DomainError::invalid_input(format!(
                    "Actual keyed by week {} records week {}",
                    week, actual.week
                )));
            }
        }

        let mut warnings = Vec::new();
        for week in actuals.keys() {
            let projected = ordered
                .binary_search_by_key(week, |projection| projection.week)
                .is_ok();
            if !projected {
                tracing::warn!(
                    week = week.value(),
                    "Actual recorded for a week without projection, ignoring"
                );
                warnings.push(AggregationWarning::OrphanActual { week: *week });
            }
        }

        let weeks = ordered
            .into_iter()
            .map(|projection| WeekFigures::resolve(projection, actuals.get(&projection.week)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PreparedWeeks { weeks, warnings })
    }

    fn sorted<'a>(
        &self,
        projections: &'a [WeeklyProjection],
    ) -> Result<Vec<&'a WeeklyProjection>, DomainError> {
        for projection in projections {
            let expected = money::sub(
                projection.total_revenue,
                projection.total_costs,
                "weekly profit",
            )?;
            if projection.weekly_profit != expected {
                return Err(DomainError::invalid_input(format!(
                    "Week {} has weekly_profit {} but total_revenue - total_costs is {}",
                    projection.week, projection.weekly_profit, expected
                )));
            }
        }

        let mut ordered: Vec<&WeeklyProjection> = projections.iter().collect();
        let in_order = ordered.windows(2).all(|pair| pair[0].week <= pair[1].week);
        if !in_order {
            ordered.sort_by_key(|projection| projection.week);
        }

        for pair in ordered.windows(2) {
            if pair[0].week == pair[1].week {
                return Err(DomainError::DuplicateWeek {
                    week: pair[0].week.value(),
                });
            }
        }

        Ok(ordered)
    }

    /// One pass over all weeks: effective totals, category sums and projection-only totals.
    fn accumulate_totals(
        &self,
        weeks: &[WeekFigures<'_>],
        report: &mut AggregateReport,
    ) -> Result<(), DomainError> {
        let mut streams = RevenueStreamTotals::default();
        let mut categories = CostCategoryTotals::default();
        let mut original = ProjectionTotals::default();

        for week in weeks {
            money::accumulate(&mut report.total_revenue, week.revenue, "total revenue")?;
            money::accumulate(&mut report.total_costs, week.costs, "total costs")?;

            streams.add(week.revenue_streams)?;
            categories.add(week.cost_categories)?;

            money::accumulate(
                &mut original.revenue,
                week.projection.total_revenue,
                "projected revenue",
            )?;
            money::accumulate(
                &mut original.costs,
                week.projection.total_costs,
                "projected costs",
            )?;

            if week.has_actual() {
                report.weeks_with_actuals += 1;
            }
        }

        original.profit = money::sub(original.revenue, original.costs, "projected profit")?;

        report.total_profit = money::sub(report.total_revenue, report.total_costs, "total profit")?;
        report.revenue_stream_totals = streams;
        report.cost_category_totals = categories;
        report.original_projection_totals = original;

        Ok(())
    }
}

/// First 1-based position where cumulative profit turns strictly positive,
/// or `N + 1` when it never does.
pub(crate) fn break_even_week(weeks: &[WeekFigures<'_>]) -> Result<u32, DomainError> {
    let mut cumulative = Decimal::ZERO;

    for (index, week) in weeks.iter().enumerate() {
        money::accumulate(&mut cumulative, week.profit, "cumulative profit")?;
        if cumulative > Decimal::ZERO {
            return Ok(index as u32 + 1);
        }
    }

    Ok(weeks.len() as u32 + 1)
}
