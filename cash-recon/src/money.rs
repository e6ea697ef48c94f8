//! Money calculation utilities using rust_decimal for precision
//!
//! Records carry `f64`; every calculation converts to `Decimal` first and
//! converts back with [`to_f64`], rounded to 2 decimal places.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// Non-finite values become zero; reconciliation math never fails.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round to the currency precision without leaving Decimal
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_else(|| {
        tracing::error!(value = %value, "Decimal out of f64 range, defaulting to zero");
        0.0
    })
}

fn overflowed(op: &'static str, lhs: Decimal, rhs: Decimal) -> Decimal {
    tracing::error!(op, lhs = %lhs, rhs = %rhs, "Decimal overflow in monetary calculation, defaulting to zero");
    Decimal::ZERO
}

/// `lhs + rhs`, zero on overflow
#[inline]
pub fn add_money(lhs: Decimal, rhs: Decimal) -> Decimal {
    lhs.checked_add(rhs).unwrap_or_else(|| overflowed("add", lhs, rhs))
}

/// `lhs - rhs`, zero on overflow
#[inline]
pub fn sub_money(lhs: Decimal, rhs: Decimal) -> Decimal {
    lhs.checked_sub(rhs).unwrap_or_else(|| overflowed("sub", lhs, rhs))
}

/// `lhs × rhs`, zero on overflow
#[inline]
pub fn mul_money(lhs: Decimal, rhs: Decimal) -> Decimal {
    lhs.checked_mul(rhs).unwrap_or_else(|| overflowed("mul", lhs, rhs))
}

/// `lhs / rhs`, zero on overflow or a zero divisor
#[inline]
pub fn div_money(lhs: Decimal, rhs: Decimal) -> Decimal {
    lhs.checked_div(rhs).unwrap_or_else(|| overflowed("div", lhs, rhs))
}

/// Sum f64 amounts in Decimal
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = f64>,
{
    amounts
        .into_iter()
        .map(to_decimal)
        .fold(Decimal::ZERO, add_money)
}
