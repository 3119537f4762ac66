//! Domain module
//!
//! Core domain types: week numbers, weekly metric records, events and errors.

pub mod context;
pub mod error;
pub mod events;
pub mod metrics;
pub mod week;

pub use context::RequestContext;
pub use error::DomainError;
pub use events::ProductEvent;
pub use metrics::{ActualMetric, CostBreakdown, RevenueBreakdown, WeeklyProjection};
pub use week::{WeekNumber, WeekNumberError, DEFAULT_MAX_HORIZON_WEEKS};
