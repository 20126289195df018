//! Rounding and percentage helpers shared by every calculator.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use be_calc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(5458.032)), dec!(5458.03));
/// assert_eq!(round_half_up(dec!(385.335)), dec!(385.34));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to whole euros, half away from zero.
pub fn round_to_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// `part / whole × 100`, rounded to two decimals.
///
/// A zero `whole` yields zero instead of dividing by zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use be_calc_core::calculations::common::percentage_of;
///
/// assert_eq!(percentage_of(dec!(5890.13), dec!(41760)), dec!(14.10));
/// assert_eq!(percentage_of(dec!(10), dec!(0)), dec!(0));
/// ```
pub fn percentage_of(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    round_half_up(part / whole * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(1704.784));

        assert_eq!(result, dec!(1704.78));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(123.455));

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        let result = round_half_up(dec!(-123.455));

        assert_eq!(result, dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_zero() {
        let result = round_half_up(dec!(0.00));

        assert_eq!(result, dec!(0.00));
    }

    // =========================================================================
    // round_to_whole tests
    // =========================================================================

    #[test]
    fn round_to_whole_rounds_half_up() {
        assert_eq!(round_to_whole(dec!(226.5)), dec!(227));
        assert_eq!(round_to_whole(dec!(226.49)), dec!(226));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
    }

    #[test]
    fn max_handles_negative_and_positive() {
        let result = max(dec!(-50.00), dec!(0));

        assert_eq!(result, dec!(0));
    }

    // =========================================================================
    // percentage_of tests
    // =========================================================================

    #[test]
    fn percentage_of_rounds_to_two_decimals() {
        let result = percentage_of(dec!(2534.32), dec!(3000));

        assert_eq!(result, dec!(84.48));
    }

    #[test]
    fn percentage_of_zero_whole_is_zero() {
        let result = percentage_of(dec!(123), Decimal::ZERO);

        assert_eq!(result, Decimal::ZERO);
    }
}
