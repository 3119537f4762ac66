//! Quarterly rollup
//!
//! Groups weeks into fixed-length quarters (13 weeks by default).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, WeekNumber};

use super::aggregator::WeekFigures;
use super::money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterSummary {
    /// 1-based quarter index
    pub quarter: u32,
    pub first_week: WeekNumber,
    pub last_week: WeekNumber,
    pub week_count: usize,
    pub weeks_with_actuals: usize,

    pub revenue: Decimal,
    pub costs: Decimal,
    pub profit: Decimal,

    pub projected_revenue: Decimal,
    pub projected_profit: Decimal,

    pub revenue_variance: Decimal,
}

impl QuarterSummary {
    fn open(quarter: u32, week: WeekNumber) -> Self {
        Self {
            quarter,
            first_week: week,
            last_week: week,
            week_count: 0,
            weeks_with_actuals: 0,
            revenue: Decimal::ZERO,
            costs: Decimal::ZERO,
            profit: Decimal::ZERO,
            projected_revenue: Decimal::ZERO,
            projected_profit: Decimal::ZERO,
            revenue_variance: Decimal::ZERO,
        }
    }

    fn push(&mut self, figures: &WeekFigures<'_>) -> Result<(), DomainError> {
        self.last_week = figures.projection.week;
        self.week_count += 1;
        if figures.has_actual() {
            self.weeks_with_actuals += 1;
        }

        money::accumulate(&mut self.revenue, figures.revenue, "quarter revenue")?;
        money::accumulate(&mut self.costs, figures.costs, "quarter costs")?;
        self.profit = money::sub(self.revenue, self.costs, "quarter profit")?;

        money::accumulate(
            &mut self.projected_revenue,
            figures.projection.total_revenue,
            "quarter projected revenue",
        )?;
        money::accumulate(
            &mut self.projected_profit,
            figures.projection.weekly_profit,
            "quarter projected profit",
        )?;
        self.revenue_variance =
            money::sub(self.revenue, self.projected_revenue, "quarter revenue variance")?;

        Ok(())
    }
}

/// Roll week-ordered figures up into quarters. Quarters with no weeks are skipped.
pub(crate) fn rollup(
    weeks: &[WeekFigures<'_>],
    weeks_per_quarter: u32,
) -> Result<Vec<QuarterSummary>, DomainError> {
    let mut quarters: Vec<QuarterSummary> = Vec::new();

    for figures in weeks {
        let week = figures.projection.week;
        let quarter = week.quarter(weeks_per_quarter);

        match quarters.last_mut() {
            Some(current) if current.quarter == quarter => current.push(figures)?,
            _ => {
                let mut summary = QuarterSummary::open(quarter, week);
                summary.push(figures)?;
                quarters.push(summary);
            }
        }
    }

    Ok(quarters)
}
