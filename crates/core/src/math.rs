//! Fixed-point price math
//!
//! Pure conversions between collateral value and debt value, plus the
//! health-factor formula. Values are 18-decimal fixed point; every
//! multiply/divide truncates toward zero at 18 fractional digits, matching
//! floor division over smallest indivisible units.

use rust_decimal::Decimal;
use thiserror::Error;

/// Fractional digits carried by all fixed-point values
pub const VALUE_SCALE: u32 = 18;

/// Sentinel health factor for debt-free positions
pub const INFINITE_HEALTH_FACTOR: Decimal = Decimal::MAX;

/// Errors from fixed-point conversions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Fixed-point overflow")]
    Overflow,

    #[error("Division by zero price")]
    DivisionByZero,
}

#[inline]
fn trunc(value: Decimal) -> Decimal {
    value.trunc_with_scale(VALUE_SCALE)
}

/// Value of `collateral` in debt units at `price` (debt units per collateral unit).
pub fn collateral_to_debt_value(collateral: Decimal, price: Decimal) -> Result<Decimal, MathError> {
    collateral
        .checked_mul(price)
        .map(trunc)
        .ok_or(MathError::Overflow)
}

/// Value of `debt` in collateral units at `price`.
///
/// Must not be called with a non-positive price; the oracle boundary
/// rejects those before they reach here.
pub fn debt_to_collateral_value(debt: Decimal, price: Decimal) -> Result<Decimal, MathError> {
    if price <= Decimal::ZERO {
        return Err(MathError::DivisionByZero);
    }
    debt.checked_div(price).map(trunc).ok_or(MathError::Overflow)
}

/// `value` marked up by `pct` percent: trunc18(value * (100 + pct) / 100).
pub fn apply_percent_markup(value: Decimal, pct: Decimal) -> Result<Decimal, MathError> {
    value
        .checked_mul(Decimal::ONE_HUNDRED + pct)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .map(trunc)
        .ok_or(MathError::Overflow)
}

/// `pct` percent of `value`: trunc18(value * pct / 100).
pub fn percent_of(value: Decimal, pct: Decimal) -> Result<Decimal, MathError> {
    value
        .checked_mul(pct)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .map(trunc)
        .ok_or(MathError::Overflow)
}

/// Health factor of a position.
///
/// `collateral_value` is the position's collateral expressed in debt units;
/// `threshold_pct` is the loan-to-value threshold (e.g. 80 for 80%).
/// Returns [`INFINITE_HEALTH_FACTOR`] when the position carries no debt.
/// Dust collateral can truncate to a zero value, which leaves a position
/// with negligible debt reporting an infinite factor; that is accepted.
pub fn health_factor(
    collateral_value: Decimal,
    debt: Decimal,
    threshold_pct: Decimal,
) -> Result<Decimal, MathError> {
    if debt.is_zero() {
        return Ok(INFINITE_HEALTH_FACTOR);
    }
    let adjusted = collateral_value
        .checked_mul(threshold_pct)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .map(trunc)
        .ok_or(MathError::Overflow)?;
    adjusted.checked_div(debt).map(trunc).ok_or(MathError::Overflow)
}
