//! Checked money arithmetic
//!
//! Sums over user-supplied decimals can leave `Decimal`'s range. These
//! helpers report that as `DomainError::AmountOverflow` instead of panicking.

use rust_decimal::Decimal;

use crate::domain::DomainError;

pub(crate) fn add(lhs: Decimal, rhs: Decimal, field: &'static str) -> Result<Decimal, DomainError> {
    lhs.checked_add(rhs)
        .ok_or(DomainError::AmountOverflow { field })
}

pub(crate) fn sub(lhs: Decimal, rhs: Decimal, field: &'static str) -> Result<Decimal, DomainError> {
    lhs.checked_sub(rhs)
        .ok_or(DomainError::AmountOverflow { field })
}

/// `None` from `checked_div` also covers a zero divisor; callers guard that first.
pub(crate) fn div(lhs: Decimal, rhs: Decimal, field: &'static str) -> Result<Decimal, DomainError> {
    lhs.checked_div(rhs)
        .ok_or(DomainError::AmountOverflow { field })
}

/// `*total += value`, checked
pub(crate) fn accumulate(
    total: &mut Decimal,
    value: Decimal,
    field: &'static str,
) -> Result<(), DomainError> {
    *total = add(*total, value, field)?;
    Ok(())
}
