//! Weekly rows
//!
//! One row per projected week with running profit, the feed for the
//! dashboard's projection table and cumulative-profit chart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, WeekNumber};

use super::aggregator::{WeekFigures, WeekSource};
use super::money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRow {
    pub week: WeekNumber,
    /// 1-based position in the ordered forecast
    pub position: u32,
    pub source: WeekSource,

    // Effective figures (actual where recorded)
    pub revenue: Decimal,
    pub costs: Decimal,
    pub profit: Decimal,
    pub cumulative_profit: Decimal,

    // Forecast figures
    pub projected_revenue: Decimal,
    pub projected_costs: Decimal,
    pub projected_profit: Decimal,

    pub revenue_variance: Decimal,
    pub profit_variance: Decimal,
}

pub(crate) fn build_rows(weeks: &[WeekFigures<'_>]) -> Result<Vec<WeeklyRow>, DomainError> {
    let mut cumulative = Decimal::ZERO;

    weeks
        .iter()
        .enumerate()
        .map(|(index, figures)| {
            money::accumulate(&mut cumulative, figures.profit, "cumulative profit")?;
            let projection = figures.projection;

            Ok(WeeklyRow {
                week: projection.week,
                position: index as u32 + 1,
                source: figures.source,
                revenue: figures.revenue,
                costs: figures.costs,
                profit: figures.profit,
                cumulative_profit: cumulative,
                projected_revenue: projection.total_revenue,
                projected_costs: projection.total_costs,
                projected_profit: projection.weekly_profit,
                revenue_variance: money::sub(
                    figures.revenue,
                    projection.total_revenue,
                    "weekly revenue variance",
                )?,
                profit_variance: money::sub(
                    figures.profit,
                    projection.weekly_profit,
                    "weekly profit variance",
                )?,
            })
        })
        .collect()
}
