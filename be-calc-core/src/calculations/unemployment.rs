//! Degressive unemployment benefit.
//!
//! The benefit is a percentage of the last gross salary, capped, and the
//! percentage drops as unemployment lasts longer:
//!
//! | Months unemployed | Rate |
//! |-------------------|------|
//! | < 3 | entry rate, any household |
//! | 3 to 11 | first-period rate by family situation |
//! | 12 to the extended length | first-period rate by family situation |
//! | from the extended length | second-period rate by family situation |
//!
//! The extended length grows by two months per year of work experience,
//! up to 48 months. The phase is derived from the duration alone.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{percentage_of, round_half_up};
use crate::calculations::error::{CalculationError, InvalidInputError};
use crate::models::FamilySituation;
use crate::rates::{RateTableError, TaxYearConfig, check_positive, check_rate};

/// One rate per family situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SituationRates {
    pub with_dependents: Decimal,
    pub living_alone: Decimal,
    pub cohabiting: Decimal,
}

impl SituationRates {
    pub fn rate_for(
        &self,
        situation: FamilySituation,
    ) -> Decimal {
        match situation {
            FamilySituation::WithDependents => self.with_dependents,
            FamilySituation::LivingAlone => self.living_alone,
            FamilySituation::Cohabiting => self.cohabiting,
        }
    }

    fn validate(
        &self,
        field: &'static str,
    ) -> Result<(), RateTableError> {
        check_rate(field, self.with_dependents)?;
        check_rate(field, self.living_alone)?;
        check_rate(field, self.cohabiting)
    }
}

/// Unemployment-benefit constants of one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnemploymentConfig {
    /// Monthly salary cap during the first months.
    pub initial_salary_cap: Decimal,

    /// Months during which `initial_salary_cap` applies.
    pub initial_cap_months: u32,

    /// Monthly salary cap afterwards.
    pub salary_cap: Decimal,

    pub entry_phase_months: u32,
    pub entry_rate: Decimal,

    /// Nominal length of the first period, before any extension.
    pub first_period_months: u32,
    pub first_period_rates: SituationRates,

    /// First-period extension per year of work experience.
    pub extension_months_per_year: u32,
    pub max_first_period_months: u32,

    pub second_period_rates: SituationRates,

    /// Flat withholding tax on the gross benefit.
    pub withholding_rate: Decimal,

    /// Net salary estimated as this share of the gross salary, for the
    /// income-loss comparison.
    pub estimated_net_salary_ratio: Decimal,
}

impl UnemploymentConfig {
    /// # Errors
    ///
    /// Returns [`RateTableError`] for rates outside `[0, 1]`, non-positive
    /// caps or phase lengths out of order.
    pub fn validate(&self) -> Result<(), RateTableError> {
        check_positive("unemployment.initial_salary_cap", self.initial_salary_cap)?;
        check_positive("unemployment.salary_cap", self.salary_cap)?;
        check_rate("unemployment.entry_rate", self.entry_rate)?;
        self.first_period_rates
            .validate("unemployment.first_period_rates")?;
        self.second_period_rates
            .validate("unemployment.second_period_rates")?;
        check_rate("unemployment.withholding_rate", self.withholding_rate)?;
        check_rate(
            "unemployment.estimated_net_salary_ratio",
            self.estimated_net_salary_ratio,
        )?;
        if self.entry_phase_months > self.first_period_months
            || self.first_period_months > self.max_first_period_months
        {
            return Err(RateTableError::Inconsistent {
                field: "unemployment.first_period_months",
                message: format!(
                    "phase lengths must satisfy entry <= first <= max, got {}, {} and {}",
                    self.entry_phase_months, self.first_period_months, self.max_first_period_months
                ),
            });
        }
        Ok(())
    }

    /// First-period length for a worker with `years_of_experience` years.
    pub fn first_period_length(
        &self,
        years_of_experience: u32,
    ) -> u32 {
        let extension = years_of_experience.saturating_mul(self.extension_months_per_year);
        self.first_period_months
            .saturating_add(extension)
            .min(self.max_first_period_months)
    }
}

/// Questionnaire answers for the unemployment-benefit calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnemploymentInput {
    pub last_gross_monthly_salary: Decimal,
    pub family_situation: FamilySituation,
    pub months_unemployed: u32,
    pub years_of_experience: u32,
}

impl UnemploymentInput {
    /// # Errors
    ///
    /// Returns [`InvalidInputError::Negative`] for a negative salary. Zero is
    /// accepted.
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        InvalidInputError::require_non_negative(
            "last_gross_monthly_salary",
            self.last_gross_monthly_salary,
        )
    }
}

/// Phase of the degressive schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenefitPhase {
    Entry,
    FirstPeriod,
    /// First-period rate kept past the nominal first period thanks to
    /// work experience.
    ExtendedFirstPeriod { month: u32, length: u32 },
    SecondPeriod,
}

impl BenefitPhase {
    pub fn label(&self) -> String {
        match self {
            Self::Entry => "Entry phase (first 3 months)".to_string(),
            Self::FirstPeriod => "First period (months 3 to 12)".to_string(),
            Self::ExtendedFirstPeriod { month, length } => {
                format!("Extended first period (month {month} of {length})")
            }
            Self::SecondPeriod => "Second period".to_string(),
        }
    }
}

impl fmt::Display for BenefitPhase {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Every amount of the unemployment-benefit calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnemploymentResult {
    pub family_situation: FamilySituation,

    pub gross_salary: Decimal,

    /// Cap in force for this month of unemployment.
    pub salary_cap: Decimal,

    /// `min(gross_salary, salary_cap)`; base of the benefit.
    pub capped_salary: Decimal,

    pub phase: BenefitPhase,

    /// First-period length including the experience extension.
    pub first_period_length: u32,

    pub benefit_rate: Decimal,

    pub gross_benefit: Decimal,
    pub withholding: Decimal,
    pub net_benefit: Decimal,

    /// Hypothetical net salary had the person kept working.
    pub estimated_net_salary: Decimal,

    /// `estimated_net_salary − net_benefit`.
    pub income_loss: Decimal,

    /// Income loss as a percentage of the estimated net salary; zero when
    /// there is no salary.
    pub loss_percentage: Decimal,
}

/// Calculator for the monthly unemployment benefit.
#[derive(Debug, Clone)]
pub struct UnemploymentBenefitCalculator<'a> {
    config: &'a UnemploymentConfig,
}

impl<'a> UnemploymentBenefitCalculator<'a> {
    pub fn new(config: &'a UnemploymentConfig) -> Self {
        Self { config }
    }

    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] for a negative salary and
    /// [`CalculationError::RateTable`] for a malformed table.
    pub fn calculate(
        &self,
        input: &UnemploymentInput,
    ) -> Result<UnemploymentResult, CalculationError> {
        input.validate()?;
        self.config.validate()?;

        let gross_salary = round_half_up(input.last_gross_monthly_salary);
        if gross_salary.is_zero() {
            warn!("no salary entered; the benefit is zero");
        }

        let salary_cap = self.salary_cap(input.months_unemployed);
        let capped_salary = gross_salary.min(salary_cap);
        let first_period_length = self.config.first_period_length(input.years_of_experience);
        let phase = self.phase(input.months_unemployed, first_period_length);
        let benefit_rate = self.benefit_rate(phase, input.family_situation);

        let gross_benefit = round_half_up(capped_salary * benefit_rate);
        let withholding = round_half_up(gross_benefit * self.config.withholding_rate);
        let net_benefit = round_half_up(gross_benefit - withholding);

        let estimated_net_salary =
            round_half_up(gross_salary * self.config.estimated_net_salary_ratio);
        let income_loss = round_half_up(estimated_net_salary - net_benefit);

        debug!(
            phase = %phase,
            benefit_rate = %benefit_rate,
            capped_salary = %capped_salary,
            net_benefit = %net_benefit,
            "unemployment benefit computed"
        );

        Ok(UnemploymentResult {
            family_situation: input.family_situation,
            gross_salary,
            salary_cap,
            capped_salary,
            phase,
            first_period_length,
            benefit_rate,
            gross_benefit,
            withholding,
            net_benefit,
            estimated_net_salary,
            income_loss,
            loss_percentage: percentage_of(income_loss, estimated_net_salary),
        })
    }

    fn salary_cap(
        &self,
        months_unemployed: u32,
    ) -> Decimal {
        if months_unemployed < self.config.initial_cap_months {
            self.config.initial_salary_cap
        } else {
            self.config.salary_cap
        }
    }

    fn phase(
        &self,
        months_unemployed: u32,
        first_period_length: u32,
    ) -> BenefitPhase {
        if months_unemployed < self.config.entry_phase_months {
            BenefitPhase::Entry
        } else if months_unemployed < self.config.first_period_months {
            BenefitPhase::FirstPeriod
        } else if months_unemployed < first_period_length {
            BenefitPhase::ExtendedFirstPeriod {
                month: months_unemployed,
                length: first_period_length,
            }
        } else {
            BenefitPhase::SecondPeriod
        }
    }

    fn benefit_rate(
        &self,
        phase: BenefitPhase,
        situation: FamilySituation,
    ) -> Decimal {
        match phase {
            BenefitPhase::Entry => self.config.entry_rate,
            BenefitPhase::FirstPeriod | BenefitPhase::ExtendedFirstPeriod { .. } => {
                self.config.first_period_rates.rate_for(situation)
            }
            BenefitPhase::SecondPeriod => self.config.second_period_rates.rate_for(situation),
        }
    }
}

/// Computes the monthly unemployment benefit.
///
/// # Errors
///
/// See [`UnemploymentBenefitCalculator::calculate`].
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use be_calc_core::{FamilySituation, TaxYearConfig, calculate_unemployment_benefit};
/// use be_calc_core::calculations::unemployment::UnemploymentInput;
///
/// let tables = TaxYearConfig::flanders_2026();
/// let input = UnemploymentInput {
///     last_gross_monthly_salary: dec!(3000),
///     family_situation: FamilySituation::LivingAlone,
///     months_unemployed: 0,
///     years_of_experience: 0,
/// };
///
/// let result = calculate_unemployment_benefit(&input, &tables).unwrap();
///
/// assert_eq!(result.net_benefit, dec!(1609.92));
/// ```
pub fn calculate_unemployment_benefit(
    input: &UnemploymentInput,
    tables: &TaxYearConfig,
) -> Result<UnemploymentResult, CalculationError> {
    UnemploymentBenefitCalculator::new(&tables.unemployment).calculate(input)
}
