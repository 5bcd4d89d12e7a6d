//! Display helpers for monetary amounts and durations.
//!
//! Amounts are kept exact everywhere in the service; rounding only happens
//! here, at the presentation edge.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol used when presenting amounts
pub const CURRENCY_SYMBOL: &str = "$";

/// Round to two decimal places, midpoints away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount as currency, e.g. `$6.67` or `-$1.50`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{:.2}", CURRENCY_SYMBOL, rounded.abs())
    } else {
        format!("{}{:.2}", CURRENCY_SYMBOL, rounded.abs())
    }
}

/// Format a fractional hour count with two decimals, e.g. `2.00`.
pub fn format_hours(hours: Decimal) -> String {
    format!("{:.2}", round_cents(hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(dec!(6.666666)), dec!(6.67));
        assert_eq!(round_cents(dec!(0.125)), dec!(0.13));
        assert_eq!(round_cents(dec!(14)), dec!(14));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(14)), "$14.00");
        assert_eq!(format_currency(dec!(6.6666666667)), "$6.67");
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
        assert_eq!(format_currency(dec!(-1.5)), "-$1.50");
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(dec!(2)), "2.00");
        assert_eq!(format_hours(dec!(0.6666666)), "0.67");
    }
}
