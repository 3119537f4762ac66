//! finance_projections Library
//!
//! Weekly projection tracking: products own a weekly forecast and recorded
//! actuals, and the [`report::Aggregator`] turns both into totals, a
//! break-even week, projection variance and actuals coverage.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod event_store;
pub mod handlers;
pub mod report;

pub use config::Config;
pub use domain::{ActualMetric, DomainError, RequestContext, WeekNumber, WeeklyProjection};
pub use error::{AppError, AppResult};
pub use report::{AggregateReport, Aggregator};
