//! Net income of a self-employed person.
//!
//! Social contributions follow a tiered schedule over the gross annual
//! income instead of a flat rate:
//!
//! - a secondary occupation below the exemption threshold pays nothing,
//!   and the tiered schedule is not evaluated at all;
//! - a primary occupation always pays at least the annual minimum
//!   (four times the quarterly minimum), even when that exceeds the income.
//!
//! The remainder then goes through the same income-tax steps as an
//! employee's salary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::brackets::{apply_brackets, validate_schedule};
use crate::calculations::common::{max, percentage_of, round_half_up};
use crate::calculations::error::{CalculationError, InvalidInputError};
use crate::calculations::income_tax::{IncomeTaxBreakdown, IncomeTaxCalculator};
use crate::models::{ContributionTier, OccupationStatus};
use crate::rates::{RateTableError, TaxYearConfig, check_non_negative};

const QUARTERS_PER_YEAR: u32 = 4;

/// Self-employed social-contribution constants of one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmployedConfig {
    /// Tiered schedule over gross annual income. Rates may decrease.
    pub contribution_tiers: Vec<ContributionTier>,

    /// Minimum contribution per quarter for a primary occupation.
    pub minimum_quarterly_contribution: Decimal,

    /// Gross annual income below which a secondary occupation is exempt.
    pub secondary_exemption_threshold: Decimal,
}

impl SelfEmployedConfig {
    /// # Errors
    ///
    /// Returns [`RateTableError`] if the tier schedule is malformed or an
    /// amount is negative.
    pub fn validate(&self) -> Result<(), RateTableError> {
        validate_schedule(
            "self_employed.contribution_tiers",
            &self.contribution_tiers,
            false,
        )?;
        check_non_negative(
            "self_employed.minimum_quarterly_contribution",
            self.minimum_quarterly_contribution,
        )?;
        check_non_negative(
            "self_employed.secondary_exemption_threshold",
            self.secondary_exemption_threshold,
        )?;
        Ok(())
    }

    /// Minimum contribution over a full year.
    pub fn minimum_annual_contribution(&self) -> Decimal {
        round_half_up(self.minimum_quarterly_contribution * Decimal::from(QUARTERS_PER_YEAR))
    }
}

/// Questionnaire answers for the self-employed calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmployedInput {
    pub gross_annual_income: Decimal,
    pub status: OccupationStatus,
    pub dependent_children: u32,
}

impl SelfEmployedInput {
    pub fn new(
        gross_annual_income: Decimal,
        status: OccupationStatus,
        dependent_children: u32,
    ) -> Self {
        Self {
            gross_annual_income,
            status,
            dependent_children,
        }
    }

    /// # Errors
    ///
    /// Returns [`InvalidInputError::NotPositive`] unless the income is
    /// greater than zero.
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        InvalidInputError::require_positive("gross_annual_income", self.gross_annual_income)
    }

    /// Same person with the income changed by `percent` %.
    pub fn adjusted_by_percent(
        &self,
        percent: Decimal,
    ) -> Self {
        Self {
            gross_annual_income: round_half_up(
                self.gross_annual_income * (Decimal::ONE + percent / Decimal::ONE_HUNDRED),
            ),
            ..self.clone()
        }
    }
}

/// Every amount of the self-employed gross-to-net calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmployedResult {
    pub status: OccupationStatus,

    pub gross_annual: Decimal,

    pub gross_monthly: Decimal,

    /// Result of the tiered schedule, before the exemption or the minimum.
    /// Zero when the exemption applies.
    pub tiered_contributions: Decimal,

    /// Contributions actually owed.
    pub social_contributions: Decimal,

    /// Contributions as a percentage of gross annual income.
    pub effective_contribution_percentage: Decimal,

    /// Secondary occupation below the exemption threshold.
    pub exempt: bool,

    /// Primary occupation whose tiered contributions fell below the minimum.
    pub minimum_applied: bool,

    /// Gross minus contributions; may be negative when the minimum exceeds
    /// the income.
    pub income_after_contributions: Decimal,

    pub income_tax: IncomeTaxBreakdown,

    pub net_annual: Decimal,

    pub net_monthly: Decimal,

    /// Net annual as a percentage of gross annual.
    pub net_percentage_of_gross: Decimal,

    /// Contributions plus total tax as a percentage of gross annual.
    pub effective_total_rate: Decimal,
}

/// Calculator for the self-employed gross-to-net pipeline.
#[derive(Debug, Clone)]
pub struct SelfEmployedNetCalculator<'a> {
    tables: &'a TaxYearConfig,
}

/// Contributions with the rule that produced them.
struct Contributions {
    tiered: Decimal,
    owed: Decimal,
    exempt: bool,
    minimum_applied: bool,
}

impl<'a> SelfEmployedNetCalculator<'a> {
    pub fn new(tables: &'a TaxYearConfig) -> Self {
        Self { tables }
    }

    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] for a non-positive income
    /// and [`CalculationError::RateTable`] for a malformed table.
    pub fn calculate(
        &self,
        input: &SelfEmployedInput,
    ) -> Result<SelfEmployedResult, CalculationError> {
        input.validate()?;
        self.tables.self_employed.validate()?;

        let gross_annual = round_half_up(input.gross_annual_income);
        let contributions = self.contributions(gross_annual, input.status);
        let income_after_contributions = round_half_up(gross_annual - contributions.owed);

        let income_tax = IncomeTaxCalculator::new(&self.tables.income_tax)
            .calculate(income_after_contributions, input.dependent_children)?;

        let net_annual = round_half_up(income_after_contributions - income_tax.total_tax);
        let twelve = Decimal::from(12);

        debug!(
            status = input.status.as_str(),
            gross_annual = %gross_annual,
            social_contributions = %contributions.owed,
            total_tax = %income_tax.total_tax,
            net_annual = %net_annual,
            "self-employed net income computed"
        );

        Ok(SelfEmployedResult {
            status: input.status,
            gross_annual,
            gross_monthly: round_half_up(gross_annual / twelve),
            tiered_contributions: contributions.tiered,
            social_contributions: contributions.owed,
            effective_contribution_percentage: percentage_of(contributions.owed, gross_annual),
            exempt: contributions.exempt,
            minimum_applied: contributions.minimum_applied,
            income_after_contributions,
            net_monthly: round_half_up(net_annual / twelve),
            net_percentage_of_gross: percentage_of(net_annual, gross_annual),
            effective_total_rate: percentage_of(
                contributions.owed + income_tax.total_tax,
                gross_annual,
            ),
            income_tax,
            net_annual,
        })
    }

    fn contributions(
        &self,
        gross_annual: Decimal,
        status: OccupationStatus,
    ) -> Contributions {
        let config = &self.tables.self_employed;

        if status == OccupationStatus::Secondary
            && gross_annual < config.secondary_exemption_threshold
        {
            debug!(
                gross_annual = %gross_annual,
                threshold = %config.secondary_exemption_threshold,
                "secondary occupation below exemption threshold; no contributions"
            );
            return Contributions {
                tiered: Decimal::ZERO,
                owed: Decimal::ZERO,
                exempt: true,
                minimum_applied: false,
            };
        }

        let tiered = apply_brackets(gross_annual, &config.contribution_tiers);

        if status == OccupationStatus::Primary {
            let minimum = config.minimum_annual_contribution();
            if minimum > gross_annual {
                warn!(
                    gross_annual = %gross_annual,
                    minimum = %minimum,
                    "minimum contribution exceeds gross income"
                );
            }
            return Contributions {
                tiered,
                owed: max(tiered, minimum),
                exempt: false,
                minimum_applied: tiered < minimum,
            };
        }

        Contributions {
            tiered,
            owed: tiered,
            exempt: false,
            minimum_applied: false,
        }
    }
}

/// Computes the net income of a self-employed person.
///
/// # Errors
///
/// See [`SelfEmployedNetCalculator::calculate`].
pub fn calculate_self_employed_net(
    input: &SelfEmployedInput,
    tables: &TaxYearConfig,
) -> Result<SelfEmployedResult, CalculationError> {
    SelfEmployedNetCalculator::new(tables).calculate(input)
}
