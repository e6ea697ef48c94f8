//! Currency normalization with the session's daily rate
//!
//! The rate lives on each session record, so a reconciliation is reproducible
//! from its own inputs.

use rust_decimal::Decimal;
use shared::models::ChannelTotal;

use crate::money::{add_money, div_money, mul_money, to_decimal};

/// Multiplier applied on top of the daily rate for the secondary foreign
/// currency (1.1).
///
/// This is a fixed approximation, not a cross rate. Summaries that include
/// secondary-currency cash inherit its imprecision.
pub const SECONDARY_CURRENCY_FACTOR: Decimal = Decimal::from_parts(11, 0, 0, false, 1);

/// Local-currency equivalent of amounts held in three currencies
///
/// `primary × rate + secondary × rate × 1.1 + local`, unrounded. An overflowing
/// step contributes zero.
pub fn to_local(primary_foreign: f64, secondary_foreign: f64, local: f64, rate: f64) -> Decimal {
    let rate = to_decimal(rate);
    let primary = mul_money(to_decimal(primary_foreign), rate);
    let secondary = mul_money(
        mul_money(to_decimal(secondary_foreign), rate),
        SECONDARY_CURRENCY_FACTOR,
    );
    add_money(add_money(primary, secondary), to_decimal(local))
}

/// Local-currency value of a declared channel total (`local + foreign × rate`)
pub fn channel_to_local(channel: &ChannelTotal, rate: f64) -> Decimal {
    add_money(
        to_decimal(channel.local),
        mul_money(to_decimal(channel.foreign), to_decimal(rate)),
    )
}

/// Primary-foreign equivalent of a local amount
///
/// A non-positive rate yields zero rather than dividing by it.
pub fn to_foreign(local: Decimal, rate: f64) -> Decimal {
    let rate = to_decimal(rate);
    if rate <= Decimal::ZERO {
        tracing::warn!(rate = %rate, "Non-positive daily rate, foreign equivalent set to zero");
        return Decimal::ZERO;
    }
    div_money(local, rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::to_f64;

    #[test]
    fn test_local_only() {
        assert_eq!(to_f64(to_local(0.0, 0.0, 950.0, 40.0)), 950.0);
    }

    #[test]
    fn test_primary_foreign_uses_rate() {
        assert_eq!(to_f64(to_local(10.0, 0.0, 0.0, 36.5)), 365.0);
    }

    #[test]
    fn test_secondary_foreign_uses_fixed_factor() {
        // 10 × 40 × 1.1
        assert_eq!(to_f64(to_local(0.0, 10.0, 0.0, 40.0)), 440.0);
        assert_eq!(to_f64(to_local(1.0, 1.0, 1.0, 40.0)), 85.0);
    }

    #[test]
    fn test_channel_to_local() {
        let channel = ChannelTotal::mixed(100.0, 2.5, 3);
        assert_eq!(to_f64(channel_to_local(&channel, 40.0)), 200.0);
        assert_eq!(
            to_f64(channel_to_local(&ChannelTotal::local(12.34, 1), 40.0)),
            12.34
        );
    }

    #[test]
    fn test_overflowing_record_does_not_panic() {
        // 1e15 × 1e15 exceeds the Decimal range
        assert_eq!(to_local(1e15, 0.0, 5.0, 1e15), Decimal::from(5));
        assert_eq!(to_local(0.0, 1e15, 0.0, 1e15), Decimal::ZERO);
        let channel = ChannelTotal::mixed(12.0, 1e15, 1);
        assert_eq!(channel_to_local(&channel, 1e15), Decimal::from(12));
        assert_eq!(to_foreign(Decimal::MAX, 1e-20), Decimal::ZERO);
    }

    #[test]
    fn test_to_foreign() {
        assert_eq!(to_f64(to_foreign(Decimal::from(40), 40.0)), 1.0);
        assert_eq!(to_foreign(Decimal::from(40), 0.0), Decimal::ZERO);
        assert_eq!(to_foreign(Decimal::from(40), -3.0), Decimal::ZERO);
    }
}
