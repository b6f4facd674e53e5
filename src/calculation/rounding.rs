//! Division and rounding helpers shared by the aggregators.
//!
//! `Decimal` has no NaN or infinity, so the only non-finite intermediate the
//! engine can meet is a zero (or overflowing) division. [`safe_div`] turns
//! both into zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Divides `numerator` by `denominator`, yielding zero when the quotient is undefined.
///
/// # Example
///
/// ```
/// use result_engine::calculation::safe_div;
/// use rust_decimal::Decimal;
///
/// assert_eq!(safe_div(Decimal::from(18), Decimal::from(5)), Decimal::new(36, 1));
/// assert_eq!(safe_div(Decimal::from(18), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Rounds to 2 decimal places, midpoint away from zero.
///
/// # Example
///
/// ```
/// use result_engine::calculation::round_2dp;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_2dp(Decimal::new(35333, 4)), Decimal::new(353, 2));
/// assert_eq!(round_2dp(Decimal::new(3445, 3)), Decimal::new(345, 2));
/// ```
pub fn round_2dp(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes `part / whole * 100`, rounded to 2 decimal places.
///
/// Scales before dividing unless scaling would overflow.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    let ratio = match part.checked_mul(Decimal::ONE_HUNDRED) {
        Some(scaled) => safe_div(scaled, whole),
        None => safe_div(part, whole).saturating_mul(Decimal::ONE_HUNDRED),
    };
    round_2dp(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_safe_div_by_zero_is_zero() {
        assert_eq!(safe_div(dec("53"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(safe_div(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_safe_div_overflow_is_zero() {
        assert_eq!(safe_div(Decimal::MAX, dec("0.1")), Decimal::ZERO);
    }

    #[test]
    fn test_round_2dp_midpoint_away_from_zero() {
        assert_eq!(round_2dp(dec("3.535")), dec("3.54"));
        assert_eq!(round_2dp(dec("3.534")), dec("3.53"));
        assert_eq!(round_2dp(dec("3.6")), dec("3.6"));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(dec("1"), dec("3")), dec("33.33"));
        assert_eq!(percentage(dec("3"), dec("10")), dec("30"));
        assert_eq!(percentage(dec("1"), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_percentage_of_huge_values_does_not_overflow() {
        assert_eq!(percentage(Decimal::MAX, Decimal::MAX), dec("100"));
        assert_eq!(percentage(Decimal::MAX, dec("2")), Decimal::MAX);
    }
}
