//! Weekly metric records
//!
//! `WeeklyProjection` is produced upstream by the forecasting routine and is
//! read-only here. `ActualMetric` is entered by users as real weeks close.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::WeekNumber;

/// Revenue split by stream. Missing streams count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_beverage: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchandise: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital: Option<Decimal>,
}

impl RevenueBreakdown {
    pub fn ticket(&self) -> Decimal {
        self.ticket.unwrap_or_default()
    }

    pub fn food_beverage(&self) -> Decimal {
        self.food_beverage.unwrap_or_default()
    }

    pub fn merchandise(&self) -> Decimal {
        self.merchandise.unwrap_or_default()
    }

    pub fn digital(&self) -> Decimal {
        self.digital.unwrap_or_default()
    }

    /// Sum of all streams, missing ones as zero. `None` on overflow.
    pub fn total(&self) -> Option<Decimal> {
        [
            self.ticket(),
            self.food_beverage(),
            self.merchandise(),
            self.digital(),
        ]
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
    }

    /// True when no stream carries a value
    pub fn is_empty(&self) -> bool {
        self.ticket.is_none()
            && self.food_beverage.is_none()
            && self.merchandise.is_none()
            && self.digital.is_none()
    }
}

/// Costs split by category. Missing categories count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staffing: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Decimal>,

    /// Cost of goods sold for food & beverage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cogs_food_beverage: Option<Decimal>,

    /// Cost of goods sold for merchandise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cogs_merchandise: Option<Decimal>,
}

impl CostBreakdown {
    pub fn marketing(&self) -> Decimal {
        self.marketing.unwrap_or_default()
    }

    pub fn staffing(&self) -> Decimal {
        self.staffing.unwrap_or_default()
    }

    pub fn event(&self) -> Decimal {
        self.event.unwrap_or_default()
    }

    pub fn setup(&self) -> Decimal {
        self.setup.unwrap_or_default()
    }

    pub fn cogs_food_beverage(&self) -> Decimal {
        self.cogs_food_beverage.unwrap_or_default()
    }

    pub fn cogs_merchandise(&self) -> Decimal {
        self.cogs_merchandise.unwrap_or_default()
    }

    /// Sum of all categories, missing ones as zero. `None` on overflow.
    pub fn total(&self) -> Option<Decimal> {
        [
            self.marketing(),
            self.staffing(),
            self.event(),
            self.setup(),
            self.cogs_food_beverage(),
            self.cogs_merchandise(),
        ]
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
    }

    /// True when no category carries a value
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One forecast week as produced by the forecasting routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyProjection {
    pub week: WeekNumber,
    pub total_revenue: Decimal,
    pub total_costs: Decimal,
    pub weekly_profit: Decimal,

    #[serde(default)]
    pub revenue: RevenueBreakdown,

    #[serde(default)]
    pub costs: CostBreakdown,
}

impl WeeklyProjection {
    /// Create a projection with `weekly_profit = total_revenue - total_costs`
    /// and empty breakdowns.
    ///
    /// The profit saturates at the decimal range; such a week fails validation.
    pub fn new(week: WeekNumber, total_revenue: Decimal, total_costs: Decimal) -> Self {
        Self {
            week,
            total_revenue,
            total_costs,
            weekly_profit: total_revenue.saturating_sub(total_costs),
            revenue: RevenueBreakdown::default(),
            costs: CostBreakdown::default(),
        }
    }

    pub fn with_revenue_breakdown(mut self, revenue: RevenueBreakdown) -> Self {
        self.revenue = revenue;
        self
    }

    pub fn with_cost_breakdown(mut self, costs: CostBreakdown) -> Self {
        self.costs = costs;
        self
    }
}

/// Real recorded figures for a week that has already happened.
///
/// Every field is optional: an absent value means the stream was not tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualMetric {
    pub week: WeekNumber,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenses: Option<Decimal>,

    #[serde(default)]
    pub revenue_breakdown: RevenueBreakdown,

    #[serde(default)]
    pub cost_breakdown: CostBreakdown,
}

impl ActualMetric {
    /// Create an actual with both totals recorded
    pub fn new(week: WeekNumber, revenue: Decimal, expenses: Decimal) -> Self {
        Self {
            week,
            revenue: Some(revenue),
            expenses: Some(expenses),
            revenue_breakdown: RevenueBreakdown::default(),
            cost_breakdown: CostBreakdown::default(),
        }
    }

    /// Create an actual with no figures yet
    pub fn empty(week: WeekNumber) -> Self {
        Self {
            week,
            revenue: None,
            expenses: None,
            revenue_breakdown: RevenueBreakdown::default(),
            cost_breakdown: CostBreakdown::default(),
        }
    }

    pub fn with_revenue(mut self, revenue: Decimal) -> Self {
        self.revenue = Some(revenue);
        self
    }

    pub fn with_expenses(mut self, expenses: Decimal) -> Self {
        self.expenses = Some(expenses);
        self
    }

    pub fn with_revenue_breakdown(mut self, revenue: RevenueBreakdown) -> Self {
        self.revenue_breakdown = revenue;
        self
    }

    pub fn with_cost_breakdown(mut self, costs: CostBreakdown) -> Self {
        self.cost_breakdown = costs;
        self
    }

    /// Both totals were recorded
    pub fn is_complete(&self) -> bool {
        self.revenue.is_some() && self.expenses.is_some()
    }

    /// Nothing at all was recorded
    pub fn is_blank(&self) -> bool {
        self.revenue.is_none()
            && self.expenses.is_none()
            && self.revenue_breakdown.is_empty()
            && self.cost_breakdown.is_empty()
    }
}
