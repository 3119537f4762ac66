//! Week number type
//!
//! Domain primitive for 1-based forecast week numbers.
//! Week numbers are validated at construction time, so a zero or negative
//! week can never reach the aggregation code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default forecast horizon (10 years of weeks)
pub const DEFAULT_MAX_HORIZON_WEEKS: u32 = 520;

/// WeekNumber represents a validated, 1-based forecast week.
///
/// # Invariants
/// - Value is always >= 1
///
/// # Example
/// ```
/// use finance_projections::domain::WeekNumber;
///
/// let week = WeekNumber::new(3).unwrap();
/// assert_eq!(week.value(), 3);
/// assert!(WeekNumber::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct WeekNumber(u32);

/// Errors that can occur when creating a WeekNumber
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeekNumberError {
    #[error("Week number must be at least 1 (got {0})")]
    NotPositive(i64),

    #[error("Week number {week} exceeds the forecast horizon of {max} weeks")]
    BeyondHorizon { week: u32, max: u32 },

    #[error("Invalid week number format: {0}")]
    ParseError(String),
}

impl WeekNumber {
    /// Create a new WeekNumber with validation.
    ///
    /// # Errors
    /// - `WeekNumberError::NotPositive` if value < 1
    pub fn new(value: i64) -> Result<Self, WeekNumberError> {
        if value < 1 {
            return Err(WeekNumberError::NotPositive(value));
        }

        let week = u32::try_from(value).map_err(|_| WeekNumberError::BeyondHorizon {
            week: u32::MAX,
            max: u32::MAX,
        })?;

        Ok(Self(week))
    }

    /// Get the underlying week value.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Check that this week lies inside a horizon of `max` weeks.
    pub fn within_horizon(self, max: u32) -> Result<Self, WeekNumberError> {
        if self.0 > max {
            return Err(WeekNumberError::BeyondHorizon { week: self.0, max });
        }
        Ok(self)
    }

    /// 1-based quarter this week falls into, for quarters of `weeks_per_quarter` weeks.
    pub fn quarter(&self, weeks_per_quarter: u32) -> u32 {
        let per_quarter = weeks_per_quarter.max(1);
        (self.0 - 1) / per_quarter + 1
    }
}

impl fmt::Display for WeekNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WeekNumber {
    type Err = WeekNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| WeekNumberError::ParseError(e.to_string()))?;
        WeekNumber::new(value)
    }
}

impl TryFrom<i64> for WeekNumber {
    type Error = WeekNumberError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        WeekNumber::new(value)
    }
}

impl From<WeekNumber> for u32 {
    fn from(week: WeekNumber) -> Self {
        week.0
    }
}
