//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::week::WeekNumberError;

/// Domain-specific errors
///
/// These errors represent rejected input and business rule violations.
/// They are independent of the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Week number is zero, negative or otherwise unusable
    #[error("Invalid week: {0}")]
    InvalidWeek(#[from] WeekNumberError),

    /// The same week appears twice in a projection sequence
    #[error("Duplicate week {week} in projection sequence")]
    DuplicateWeek { week: u32 },

    /// Projection sequence is longer than the configured horizon
    #[error("Projection has {weeks} weeks, horizon allows at most {max}")]
    HorizonExceeded { weeks: usize, max: u32 },

    /// A sum or ratio over the supplied amounts leaves the decimal range
    #[error("Amount overflow while computing {field}")]
    AmountOverflow { field: &'static str },

    /// Any other rejected input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No actual recorded for the week
    #[error("No actual recorded for week {week}")]
    ActualNotFound { week: u32 },

    /// Aggregate version conflict (optimistic locking)
    #[error("Version conflict: expected {expected}, found {found}")]
    VersionConflict { expected: i64, found: i64 },
}

impl DomainError {
    /// Create a generic invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Check if this is a validation error (the caller's input was rejected)
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidWeek(_)
                | Self::DuplicateWeek { .. }
                | Self::HorizonExceeded { .. }
                | Self::AmountOverflow { .. }
                | Self::InvalidInput(_)
        )
    }

    /// Check if this is a conflict error (retry may help)
    pub fn is_conflict_error(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}
