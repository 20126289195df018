//! Progressive bracket evaluation.
//!
//! Income is split over consecutive bands, each taxed at its own rate. The
//! same walk serves the income-tax schedule ([`TaxBracket`]) and the
//! self-employed contribution schedule ([`ContributionTier`]).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use be_calc_core::TaxBracket;
//! use be_calc_core::calculations::brackets::apply_brackets;
//!
//! let brackets = vec![
//!     TaxBracket::new(dec!(15200), dec!(0.25)),
//!     TaxBracket::new(dec!(26830), dec!(0.40)),
//!     TaxBracket::new(dec!(49840), dec!(0.45)),
//!     TaxBracket::unbounded(dec!(0.50)),
//! ];
//!
//! // 15200 × 25% + 4261.97 × 40%
//! assert_eq!(apply_brackets(dec!(19461.97), &brackets), dec!(5504.79));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::models::{ContributionTier, TaxBracket};
use crate::rates::{RateTableError, check_rate};

/// A band of a progressive schedule.
pub trait RateBand {
    /// Inclusive ceiling of the band, `None` for the open-ended top band.
    fn upper_bound(&self) -> Option<Decimal>;

    fn rate(&self) -> Decimal;
}

impl RateBand for TaxBracket {
    fn upper_bound(&self) -> Option<Decimal> {
        self.upper_bound
    }

    fn rate(&self) -> Decimal {
        self.rate
    }
}

impl RateBand for ContributionTier {
    fn upper_bound(&self) -> Option<Decimal> {
        self.upper_bound
    }

    fn rate(&self) -> Decimal {
        self.rate
    }
}

/// The part of an amount that fell into one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    /// Portion of the amount taxed in this band.
    pub taxed_amount: Decimal,
    /// Unrounded `taxed_amount × rate`.
    pub tax: Decimal,
}

/// Splits `amount` over `bands`, lowest band first.
///
/// Only bands that receive a non-zero portion are returned. An amount past
/// the last finite bound is absorbed by the unbounded band.
pub fn bracket_breakdown<B: RateBand>(
    amount: Decimal,
    bands: &[B],
) -> Vec<BracketSlice> {
    let mut slices = Vec::new();
    let mut remaining = amount;
    let mut previous_upper_bound = Decimal::ZERO;

    for band in bands {
        if remaining <= Decimal::ZERO {
            break;
        }

        let taxed_amount = match band.upper_bound() {
            Some(upper) => remaining.min(upper - previous_upper_bound),
            None => remaining,
        };

        slices.push(BracketSlice {
            lower_bound: previous_upper_bound,
            upper_bound: band.upper_bound(),
            rate: band.rate(),
            taxed_amount,
            tax: taxed_amount * band.rate(),
        });

        remaining -= taxed_amount;
        match band.upper_bound() {
            Some(upper) => previous_upper_bound = upper,
            None => break,
        }
    }

    slices
}

/// Total owed on `amount` under `bands`, rounded to cents.
///
/// Zero or negative amounts owe nothing.
pub fn apply_brackets<B: RateBand>(
    amount: Decimal,
    bands: &[B],
) -> Decimal {
    round_half_up(
        bracket_breakdown(amount, bands)
            .iter()
            .map(|slice| slice.tax)
            .sum(),
    )
}

/// Rate applied to the next euro above `amount`.
///
/// Returns zero for an empty schedule.
pub fn marginal_rate<B: RateBand>(
    amount: Decimal,
    bands: &[B],
) -> Decimal {
    for band in bands {
        match band.upper_bound() {
            Some(upper) if amount >= upper => continue,
            _ => return band.rate(),
        }
    }
    bands.last().map(RateBand::rate).unwrap_or(Decimal::ZERO)
}

/// Checks the ordering invariants of a schedule.
///
/// Bounds must be positive and strictly increasing, only the last band may
/// (and must) be unbounded, and every rate must lie in `[0, 1]`. With
/// `non_decreasing_rates` set, each rate must also be at least the rate of
/// the band below it.
///
/// # Errors
///
/// Returns the first violated invariant as a [`RateTableError`].
pub fn validate_schedule<B: RateBand>(
    schedule: &'static str,
    bands: &[B],
    non_decreasing_rates: bool,
) -> Result<(), RateTableError> {
    if bands.is_empty() {
        return Err(RateTableError::EmptySchedule { schedule });
    }

    let last_index = bands.len() - 1;
    let mut previous_bound = Decimal::ZERO;
    let mut previous_rate: Option<Decimal> = None;

    for (index, band) in bands.iter().enumerate() {
        check_rate(schedule, band.rate())?;

        if non_decreasing_rates {
            if let Some(previous) = previous_rate {
                if band.rate() < previous {
                    return Err(RateTableError::DecreasingRate {
                        schedule,
                        index,
                        rate: band.rate(),
                    });
                }
            }
        }
        previous_rate = Some(band.rate());

        match band.upper_bound() {
            Some(bound) if bound <= previous_bound => {
                return Err(RateTableError::BoundsNotIncreasing {
                    schedule,
                    index,
                    bound,
                });
            }
            Some(_) if index == last_index => {
                return Err(RateTableError::MissingUnboundedBand { schedule });
            }
            Some(bound) => previous_bound = bound,
            None if index != last_index => {
                return Err(RateTableError::UnboundedBandNotLast { schedule, index });
            }
            None => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn income_tax_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket::new(dec!(15200), dec!(0.25)),
            TaxBracket::new(dec!(26830), dec!(0.40)),
            TaxBracket::new(dec!(49840), dec!(0.45)),
            TaxBracket::unbounded(dec!(0.50)),
        ]
    }

    fn contribution_tiers() -> Vec<ContributionTier> {
        vec![
            ContributionTier::new(dec!(75024), dec!(0.205)),
            ContributionTier::new(dec!(108238.40), dec!(0.1416)),
            ContributionTier::unbounded(dec!(0)),
        ]
    }

    // =========================================================================
    // apply_brackets tests
    // =========================================================================

    #[test]
    fn apply_brackets_zero_amount_is_zero() {
        assert_eq!(apply_brackets(dec!(0), &income_tax_brackets()), dec!(0));
        assert_eq!(apply_brackets(dec!(0), &contribution_tiers()), dec!(0));
    }

    #[test]
    fn apply_brackets_negative_amount_is_zero() {
        let result = apply_brackets(dec!(-500), &income_tax_brackets());

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn apply_brackets_first_bracket_only() {
        let result = apply_brackets(dec!(10000), &income_tax_brackets());

        assert_eq!(result, dec!(2500.00));
    }

    #[test]
    fn apply_brackets_exactly_on_bound() {
        let result = apply_brackets(dec!(15200), &income_tax_brackets());

        assert_eq!(result, dec!(3800.00));
    }

    #[test]
    fn apply_brackets_spans_two_brackets() {
        let result = apply_brackets(dec!(19461.97), &income_tax_brackets());

        assert_eq!(result, dec!(5504.79));
    }

    #[test]
    fn apply_brackets_top_bracket_absorbs_remainder() {
        // 3800 + 4652 + 10354.50 + 50160 × 50%
        let result = apply_brackets(dec!(100000), &income_tax_brackets());

        assert_eq!(result, dec!(43886.50));
    }

    #[test]
    fn apply_brackets_contribution_tiers_stop_at_ceiling() {
        // 75024 × 20.5% + 33214.40 × 14.16%
        let capped = apply_brackets(dec!(108238.40), &contribution_tiers());
        let above = apply_brackets(dec!(500000), &contribution_tiers());

        assert_eq!(capped, dec!(20083.08));
        assert_eq!(above, capped);
    }

    #[test]
    fn apply_brackets_is_monotonic() {
        let brackets = income_tax_brackets();
        let mut previous = Decimal::ZERO;
        let mut amount = Decimal::ZERO;

        while amount <= dec!(80000) {
            let tax = apply_brackets(amount, &brackets);
            assert!(tax >= previous, "tax dropped at {amount}");
            previous = tax;
            amount += dec!(137.37);
        }
    }

    #[test]
    fn apply_brackets_is_continuous_at_every_bound() {
        let brackets = income_tax_brackets();
        let step = dec!(0.01);

        for bracket in brackets.iter().filter_map(|b| b.upper_bound) {
            let below = apply_brackets(bracket - step, &brackets);
            let above = apply_brackets(bracket + step, &brackets);

            // Two cents at the highest marginal rate, plus rounding slack.
            assert!(above - below <= dec!(0.02), "jump at bound {bracket}");
            assert!(above >= below);
        }
    }

    // =========================================================================
    // bracket_breakdown tests
    // =========================================================================

    #[test]
    fn bracket_breakdown_lists_touched_brackets() {
        let slices = bracket_breakdown(dec!(19461.97), &income_tax_brackets());

        assert_eq!(
            slices,
            vec![
                BracketSlice {
                    lower_bound: dec!(0),
                    upper_bound: Some(dec!(15200)),
                    rate: dec!(0.25),
                    taxed_amount: dec!(15200),
                    tax: dec!(3800.00),
                },
                BracketSlice {
                    lower_bound: dec!(15200),
                    upper_bound: Some(dec!(26830)),
                    rate: dec!(0.40),
                    taxed_amount: dec!(4261.97),
                    tax: dec!(1704.7880),
                },
            ]
        );
    }

    #[test]
    fn bracket_breakdown_empty_for_zero() {
        let slices = bracket_breakdown(dec!(0), &income_tax_brackets());

        assert!(slices.is_empty());
    }

    // =========================================================================
    // marginal_rate tests
    // =========================================================================

    #[test]
    fn marginal_rate_follows_brackets() {
        let brackets = income_tax_brackets();

        assert_eq!(marginal_rate(dec!(0), &brackets), dec!(0.25));
        assert_eq!(marginal_rate(dec!(15199.99), &brackets), dec!(0.25));
        assert_eq!(marginal_rate(dec!(15200), &brackets), dec!(0.40));
        assert_eq!(marginal_rate(dec!(19461.97), &brackets), dec!(0.40));
        assert_eq!(marginal_rate(dec!(1000000), &brackets), dec!(0.50));
    }

    #[test]
    fn marginal_rate_empty_schedule_is_zero() {
        let brackets: Vec<TaxBracket> = Vec::new();

        assert_eq!(marginal_rate(dec!(1000), &brackets), dec!(0));
    }

    // =========================================================================
    // validate_schedule tests
    // =========================================================================

    #[test]
    fn validate_schedule_accepts_builtin_shapes() {
        assert_eq!(
            validate_schedule("income", &income_tax_brackets(), true),
            Ok(())
        );
        assert_eq!(
            validate_schedule("tiers", &contribution_tiers(), false),
            Ok(())
        );
    }

    #[test]
    fn validate_schedule_rejects_empty() {
        let brackets: Vec<TaxBracket> = Vec::new();

        assert_eq!(
            validate_schedule("income", &brackets, true),
            Err(RateTableError::EmptySchedule { schedule: "income" })
        );
    }

    #[test]
    fn validate_schedule_rejects_unsorted_bounds() {
        let brackets = vec![
            TaxBracket::new(dec!(20000), dec!(0.25)),
            TaxBracket::new(dec!(15000), dec!(0.40)),
            TaxBracket::unbounded(dec!(0.50)),
        ];

        assert_eq!(
            validate_schedule("income", &brackets, true),
            Err(RateTableError::BoundsNotIncreasing {
                schedule: "income",
                index: 1,
                bound: dec!(15000),
            })
        );
    }

    #[test]
    fn validate_schedule_rejects_missing_top_band() {
        let brackets = vec![
            TaxBracket::new(dec!(15200), dec!(0.25)),
            TaxBracket::new(dec!(26830), dec!(0.40)),
        ];

        assert_eq!(
            validate_schedule("income", &brackets, true),
            Err(RateTableError::MissingUnboundedBand { schedule: "income" })
        );
    }

    #[test]
    fn validate_schedule_rejects_early_unbounded_band() {
        let brackets = vec![
            TaxBracket::unbounded(dec!(0.25)),
            TaxBracket::unbounded(dec!(0.50)),
        ];

        assert_eq!(
            validate_schedule("income", &brackets, true),
            Err(RateTableError::UnboundedBandNotLast {
                schedule: "income",
                index: 0,
            })
        );
    }

    #[test]
    fn validate_schedule_rate_order_only_when_requested() {
        assert_eq!(
            validate_schedule("tiers", &contribution_tiers(), true),
            Err(RateTableError::DecreasingRate {
                schedule: "tiers",
                index: 1,
                rate: dec!(0.1416),
            })
        );
    }

    #[test]
    fn validate_schedule_rejects_rate_above_one() {
        let brackets = vec![TaxBracket::unbounded(dec!(1.5))];

        assert_eq!(
            validate_schedule("income", &brackets, true),
            Err(RateTableError::RateOutOfRange {
                field: "income",
                value: dec!(1.5),
            })
        );
    }
}
