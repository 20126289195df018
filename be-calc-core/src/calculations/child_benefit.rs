//! Monthly child benefit ("Groeipakket").
//!
//! Children born on or after the cutoff date fall under the new system: one
//! flat base amount per child. Older children keep the legacy system, where
//! the base amount depends on the child's birth-order rank among its
//! siblings and an age supplement is paid from age 6.
//!
//! Both systems add the same income-tested supplement and the same annual
//! school bonus. A child aged 25 or older, or an adult child that no longer
//! studies, receives nothing.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::round_half_up;
use crate::calculations::error::{CalculationError, InvalidInputError};
use crate::models::{ChildRecord, FamilyContext, IncomeLimit};
use crate::rates::{RateTableError, TaxYearConfig, check_non_negative, check_positive};

/// Amount paid from `min_age` on, until the next band starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBand {
    pub min_age: u32,
    pub amount: Decimal,
}

impl AgeBand {
    pub fn new(
        min_age: u32,
        amount: Decimal,
    ) -> Self {
        Self { min_age, amount }
    }
}

/// Amount of the highest band `age` has reached, zero below the first band.
fn age_band_amount(
    bands: &[AgeBand],
    age: u32,
) -> Decimal {
    bands
        .iter()
        .rev()
        .find(|band| age >= band.min_age)
        .map(|band| band.amount)
        .unwrap_or(Decimal::ZERO)
}

fn validate_age_bands(
    field: &'static str,
    bands: &[AgeBand],
) -> Result<(), RateTableError> {
    for pair in bands.windows(2) {
        if pair[1].min_age <= pair[0].min_age {
            return Err(RateTableError::Inconsistent {
                field,
                message: format!(
                    "age {} does not follow age {}",
                    pair[1].min_age, pair[0].min_age
                ),
            });
        }
    }
    for band in bands {
        check_non_negative(field, band.amount)?;
    }
    Ok(())
}

/// Income-tested social supplement, shared by both systems.
///
/// With `limit = income_limit.limit(household_size)`:
///
/// | Family income | Supplement |
/// |---------------|------------|
/// | above `upper_factor × limit` | 0 |
/// | above `limit` | `minimum` |
/// | above `lower_factor × limit` | `middle` |
/// | otherwise | `maximum` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSupplementConfig {
    pub income_limit: IncomeLimit,
    pub minimum: Decimal,
    pub middle: Decimal,
    pub maximum: Decimal,
    pub upper_factor: Decimal,
    pub lower_factor: Decimal,
}

impl IncomeSupplementConfig {
    fn validate(&self) -> Result<(), RateTableError> {
        check_positive(
            "child_benefit.income_supplement.income_limit.base",
            self.income_limit.base,
        )?;
        check_non_negative(
            "child_benefit.income_supplement.income_limit.per_person",
            self.income_limit.per_person,
        )?;
        check_non_negative("child_benefit.income_supplement.minimum", self.minimum)?;
        check_non_negative("child_benefit.income_supplement.middle", self.middle)?;
        check_non_negative("child_benefit.income_supplement.maximum", self.maximum)?;
        check_positive(
            "child_benefit.income_supplement.lower_factor",
            self.lower_factor,
        )?;
        if self.upper_factor < Decimal::ONE || self.lower_factor > Decimal::ONE {
            return Err(RateTableError::Inconsistent {
                field: "child_benefit.income_supplement",
                message: format!(
                    "factors must satisfy lower <= 1 <= upper, got {} and {}",
                    self.lower_factor, self.upper_factor
                ),
            });
        }
        Ok(())
    }

    /// Supplement for a family income against an already computed limit.
    pub fn supplement(
        &self,
        family_income: Decimal,
        limit: Decimal,
    ) -> Decimal {
        if family_income > limit * self.upper_factor {
            Decimal::ZERO
        } else if family_income > limit {
            self.minimum
        } else if family_income > limit * self.lower_factor {
            self.middle
        } else {
            self.maximum
        }
    }
}

/// Child-benefit constants of one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildBenefitConfig {
    /// First birth date covered by the new system.
    pub new_system_cutoff: NaiveDate,

    /// Age from which no benefit is paid at all.
    pub max_age: u32,

    /// Age from which the child must be studying to stay entitled.
    pub adult_age: u32,

    pub new_system_base: Decimal,

    /// Legacy base amount by birth-order rank. Ranks past the end of the
    /// list use the last amount.
    pub legacy_base_by_rank: Vec<Decimal>,

    /// Legacy monthly age supplement.
    pub legacy_age_supplements: Vec<AgeBand>,

    /// Annual school bonus, paid once per year in both systems.
    pub school_bonus: Vec<AgeBand>,

    pub income_supplement: IncomeSupplementConfig,

    /// Indicative monthly supplement for a child with a recognised
    /// disability. The real amount depends on a medical assessment.
    pub disability_supplement: Decimal,
}

impl ChildBenefitConfig {
    /// # Errors
    ///
    /// Returns [`RateTableError`] for negative amounts, unordered age bands,
    /// an empty rank table or an adult age at or above the maximum age.
    pub fn validate(&self) -> Result<(), RateTableError> {
        if self.adult_age >= self.max_age {
            return Err(RateTableError::Inconsistent {
                field: "child_benefit.adult_age",
                message: format!(
                    "adult age {} must be below maximum age {}",
                    self.adult_age, self.max_age
                ),
            });
        }
        check_non_negative("child_benefit.new_system_base", self.new_system_base)?;
        if self.legacy_base_by_rank.is_empty() {
            return Err(RateTableError::Inconsistent {
                field: "child_benefit.legacy_base_by_rank",
                message: "at least one rank amount is required".to_string(),
            });
        }
        for amount in &self.legacy_base_by_rank {
            check_non_negative("child_benefit.legacy_base_by_rank", *amount)?;
        }
        validate_age_bands(
            "child_benefit.legacy_age_supplements",
            &self.legacy_age_supplements,
        )?;
        validate_age_bands("child_benefit.school_bonus", &self.school_bonus)?;
        self.income_supplement.validate()?;
        check_non_negative(
            "child_benefit.disability_supplement",
            self.disability_supplement,
        )?;
        Ok(())
    }

    fn legacy_base(
        &self,
        rank: u32,
    ) -> Decimal {
        let index = usize::try_from(rank.saturating_sub(1)).unwrap_or(usize::MAX);
        self.legacy_base_by_rank
            .get(index)
            .or(self.legacy_base_by_rank.last())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Benefit system a child falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenefitSystem {
    New,
    Legacy,
}

impl BenefitSystem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New system (born on or after 1 January 2019)",
            Self::Legacy => "Legacy system (born before 1 January 2019)",
        }
    }
}

/// Why a child receives nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoEntitlementReason {
    /// The child reached the maximum age.
    TooOld { age: u32 },
    /// The child is an adult and no longer studies.
    AdultNotStudying { age: u32 },
}

impl fmt::Display for NoEntitlementReason {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::TooOld { age } => write!(f, "no entitlement: child is {age}, past the maximum age"),
            Self::AdultNotStudying { age } => {
                write!(f, "no entitlement: child is {age} and no longer studying")
            }
        }
    }
}

/// Benefit of one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildBenefitResult {
    pub birth_date: NaiveDate,

    /// Completed years on the evaluation date.
    pub age: u32,

    pub system: BenefitSystem,

    /// Position among all siblings by birth date, oldest first.
    pub birth_rank: u32,

    pub base_amount: Decimal,
    pub income_supplement: Decimal,

    /// Legacy system only.
    pub age_supplement: Decimal,

    pub disability_supplement: Decimal,

    /// Set when `disability_supplement` is an indicative amount.
    pub disability_is_estimate: bool,

    /// Annual, not included in `monthly_total`.
    pub school_bonus: Decimal,

    pub monthly_total: Decimal,

    /// `monthly_total × 12 + school_bonus`.
    pub annual_total: Decimal,

    /// Set when the child receives nothing; every amount is zero then.
    pub no_entitlement: Option<NoEntitlementReason>,
}

/// Per-child benefits, in input order, with family totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildBenefitSummary {
    pub evaluation_date: NaiveDate,
    pub children: Vec<ChildBenefitResult>,

    /// Income limit of the household for the social supplement.
    pub income_limit: Decimal,

    pub total_monthly: Decimal,
    pub total_annual: Decimal,
}

/// Calculator for the monthly child benefit of a family.
#[derive(Debug, Clone)]
pub struct ChildBenefitCalculator<'a> {
    config: &'a ChildBenefitConfig,
}

impl<'a> ChildBenefitCalculator<'a> {
    pub fn new(config: &'a ChildBenefitConfig) -> Self {
        Self { config }
    }

    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] for a negative family
    /// income, an empty household or a child born after `evaluation_date`,
    /// and [`CalculationError::RateTable`] for a malformed table.
    pub fn calculate(
        &self,
        children: &[ChildRecord],
        family: &FamilyContext,
        evaluation_date: NaiveDate,
    ) -> Result<ChildBenefitSummary, CalculationError> {
        self.config.validate()?;
        validate_family(family)?;
        for child in children {
            if child.birth_date > evaluation_date {
                return Err(InvalidInputError::BirthDateAfterEvaluation {
                    birth_date: child.birth_date,
                    evaluation_date,
                }
                .into());
            }
        }

        let income_limit = round_half_up(
            self.config
                .income_supplement
                .income_limit
                .limit(family.household_size),
        );
        let income_supplement = self
            .config
            .income_supplement
            .supplement(family.gross_annual_family_income, income_limit);
        let ranks = birth_ranks(children);

        let results: Vec<ChildBenefitResult> = children
            .iter()
            .zip(ranks)
            .map(|(child, rank)| self.child_benefit(child, rank, income_supplement, evaluation_date))
            .collect();

        let total_monthly = round_half_up(results.iter().map(|r| r.monthly_total).sum());
        let total_annual = round_half_up(results.iter().map(|r| r.annual_total).sum());

        debug!(
            children = results.len(),
            income_limit = %income_limit,
            income_supplement = %income_supplement,
            total_monthly = %total_monthly,
            "child benefit computed"
        );

        Ok(ChildBenefitSummary {
            evaluation_date,
            children: results,
            income_limit,
            total_monthly,
            total_annual,
        })
    }

    fn child_benefit(
        &self,
        child: &ChildRecord,
        birth_rank: u32,
        income_supplement: Decimal,
        evaluation_date: NaiveDate,
    ) -> ChildBenefitResult {
        let age = child.age_on(evaluation_date);
        let system = if child.uses_new_system(self.config.new_system_cutoff) {
            BenefitSystem::New
        } else {
            BenefitSystem::Legacy
        };

        let mut result = ChildBenefitResult {
            birth_date: child.birth_date,
            age,
            system,
            birth_rank,
            base_amount: Decimal::ZERO,
            income_supplement: Decimal::ZERO,
            age_supplement: Decimal::ZERO,
            disability_supplement: Decimal::ZERO,
            disability_is_estimate: false,
            school_bonus: Decimal::ZERO,
            monthly_total: Decimal::ZERO,
            annual_total: Decimal::ZERO,
            no_entitlement: None,
        };

        if let Some(reason) = self.no_entitlement(child, age) {
            warn!(birth_date = %child.birth_date, %reason, "child is not entitled");
            result.no_entitlement = Some(reason);
            return result;
        }

        match system {
            BenefitSystem::New => {
                result.base_amount = self.config.new_system_base;
            }
            BenefitSystem::Legacy => {
                result.base_amount = self.config.legacy_base(birth_rank);
                result.age_supplement =
                    age_band_amount(&self.config.legacy_age_supplements, age);
            }
        }
        result.income_supplement = income_supplement;
        result.school_bonus = age_band_amount(&self.config.school_bonus, age);

        if child.has_recognized_disability {
            result.disability_supplement = self.config.disability_supplement;
            result.disability_is_estimate = true;
        }

        result.monthly_total = round_half_up(
            result.base_amount
                + result.income_supplement
                + result.age_supplement
                + result.disability_supplement,
        );
        result.annual_total =
            round_half_up(result.monthly_total * Decimal::from(12) + result.school_bonus);
        result
    }

    fn no_entitlement(
        &self,
        child: &ChildRecord,
        age: u32,
    ) -> Option<NoEntitlementReason> {
        if age >= self.config.max_age {
            Some(NoEntitlementReason::TooOld { age })
        } else if age >= self.config.adult_age && !child.is_studying {
            Some(NoEntitlementReason::AdultNotStudying { age })
        } else {
            None
        }
    }
}

pub(crate) fn validate_family(family: &FamilyContext) -> Result<(), InvalidInputError> {
    InvalidInputError::require_non_negative(
        "gross_annual_family_income",
        family.gross_annual_family_income,
    )?;
    InvalidInputError::require_positive("household_size", Decimal::from(family.household_size))
}

/// 1-based birth-order rank of each child, oldest first, in input order.
///
/// Children sharing a birth date keep their input order.
fn birth_ranks(children: &[ChildRecord]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..children.len()).collect();
    order.sort_by_key(|&index| children[index].birth_date);

    let mut ranks = vec![0; children.len()];
    for (position, index) in order.into_iter().enumerate() {
        ranks[index] = u32::try_from(position + 1).unwrap_or(u32::MAX);
    }
    ranks
}

/// Computes the child benefit of every child in `children`.
///
/// # Errors
///
/// See [`ChildBenefitCalculator::calculate`].
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use be_calc_core::{ChildRecord, FamilyContext, TaxYearConfig, calculate_child_benefits};
///
/// let tables = TaxYearConfig::flanders_2026();
/// let child = ChildRecord::new(NaiveDate::from_ymd_opt(2021, 4, 2).unwrap());
/// let family = FamilyContext {
///     gross_annual_family_income: dec!(90000),
///     household_size: 3,
/// };
/// let today = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
///
/// let summary = calculate_child_benefits(&[child], &family, today, &tables).unwrap();
///
/// assert_eq!(summary.total_monthly, dec!(184.62));
/// ```
pub fn calculate_child_benefits(
    children: &[ChildRecord],
    family: &FamilyContext,
    evaluation_date: NaiveDate,
    tables: &TaxYearConfig,
) -> Result<ChildBenefitSummary, CalculationError> {
    ChildBenefitCalculator::new(&tables.child_benefit).calculate(children, family, evaluation_date)
}
