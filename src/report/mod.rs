//! Report module
//!
//! Pure computations over a product's forecast and actuals: the aggregate
//! summary, per-week rows and quarterly rollups. Nothing here performs I/O.

mod aggregator;
mod money;
mod quarterly;
mod summary;
mod weekly;

pub use aggregator::{Aggregator, WeekSource, DEFAULT_WEEKS_PER_QUARTER};
pub use quarterly::QuarterSummary;
pub use summary::{
    AggregateReport, AggregationWarning, CostCategoryTotals, ProjectionTotals,
    RevenueStreamTotals,
};
pub use weekly::WeeklyRow;
