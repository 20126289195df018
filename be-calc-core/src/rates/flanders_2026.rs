//! Built-in rates for assessment year 2026 (income 2025), Flanders.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::TaxYearConfig;
use crate::calculations::child_benefit::{AgeBand, ChildBenefitConfig, IncomeSupplementConfig};
use crate::calculations::child_benefit_extras::{
    ChildBenefitExtrasConfig, ChildcareAllowanceConfig, PointsBand, SchoolAllowanceConfig,
    StudyGrantConfig,
};
use crate::calculations::eligibility::{EligibilityConfig, WorkRequirement};
use crate::calculations::employee::EmployeeConfig;
use crate::calculations::income_tax::IncomeTaxConfig;
use crate::calculations::self_employed::SelfEmployedConfig;
use crate::calculations::unemployment::{SituationRates, UnemploymentConfig};
use crate::models::{ContributionTier, IncomeLimit, TaxBracket, TaxFreeAllowance};

impl TaxYearConfig {
    /// Rate table for assessment year 2026.
    pub fn flanders_2026() -> Self {
        Self {
            tax_year: 2026,
            income_tax: IncomeTaxConfig {
                brackets: vec![
                    TaxBracket::new(dec!(15200), dec!(0.25)),
                    TaxBracket::new(dec!(26830), dec!(0.40)),
                    TaxBracket::new(dec!(49840), dec!(0.45)),
                    TaxBracket::unbounded(dec!(0.50)),
                ],
                tax_free_allowance: TaxFreeAllowance {
                    base: dec!(10910),
                    per_dependent_child: dec!(1890),
                },
                professional_expense_rate: dec!(0.30),
                professional_expense_cap: dec!(5930),
                municipal_surcharge_rate: dec!(0.07),
            },
            employee: EmployeeConfig {
                annualization_factor: dec!(13.92),
                social_security_rate: dec!(0.1307),
            },
            self_employed: SelfEmployedConfig {
                contribution_tiers: vec![
                    ContributionTier::new(dec!(75024), dec!(0.205)),
                    ContributionTier::new(dec!(108238.40), dec!(0.1416)),
                    ContributionTier::unbounded(dec!(0)),
                ],
                minimum_quarterly_contribution: dec!(898.30),
                secondary_exemption_threshold: dec!(1881.75),
            },
            child_benefit: ChildBenefitConfig {
                // 2019-01-01 is a valid date; the fallback is never taken.
                new_system_cutoff: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default(),
                max_age: 25,
                adult_age: 18,
                new_system_base: dec!(184.62),
                legacy_base_by_rank: vec![dec!(106.27), dec!(196.55), dec!(293.11), dec!(293.11)],
                legacy_age_supplements: vec![
                    AgeBand::new(6, dec!(23.22)),
                    AgeBand::new(12, dec!(34.82)),
                    AgeBand::new(18, dec!(41.46)),
                ],
                school_bonus: vec![
                    AgeBand::new(0, dec!(0)),
                    AgeBand::new(6, dec!(23.07)),
                    AgeBand::new(12, dec!(46.14)),
                    AgeBand::new(18, dec!(69.22)),
                ],
                income_supplement: IncomeSupplementConfig {
                    income_limit: IncomeLimit {
                        base: dec!(35000),
                        per_person: dec!(6500),
                    },
                    minimum: dec!(37.31),
                    middle: dec!(72.60),
                    maximum: dec!(108.29),
                    upper_factor: dec!(1.5),
                    lower_factor: dec!(0.5),
                },
                disability_supplement: dec!(100),
            },
            child_benefit_extras: ChildBenefitExtrasConfig {
                childcare: ChildcareAllowanceConfig {
                    daily_amount: dec!(3.66),
                    max_days_per_month: 31,
                },
                school_allowance: SchoolAllowanceConfig {
                    income_limit: IncomeLimit {
                        base: dec!(32000),
                        per_person: dec!(3500),
                    },
                    kindergarten: dec!(113),
                    primary: dec!(132),
                    secondary: dec!(215),
                    doubling_ratio: dec!(0.5),
                },
                study_grant: StudyGrantConfig {
                    income_limit: IncomeLimit {
                        base: dec!(40000),
                        per_person: dec!(5000),
                    },
                    upper_factor: dec!(1.5),
                    lower_factor: dec!(0.5),
                    at_home_high: dec!(2000),
                    at_home_low: dec!(500),
                    student_housing_high: dec!(5000),
                    student_housing_low: dec!(2500),
                    distance_bonus: dec!(500),
                    distance_threshold_km: 30,
                },
                care_supplement: vec![
                    PointsBand::new(6, dec!(100)),
                    PointsBand::new(9, dec!(200)),
                    PointsBand::new(12, dec!(350)),
                    PointsBand::new(15, dec!(500)),
                    PointsBand::new(18, dec!(650)),
                ],
            },
            unemployment: UnemploymentConfig {
                initial_salary_cap: dec!(2754.76),
                initial_cap_months: 6,
                salary_cap: dec!(2574.25),
                entry_phase_months: 3,
                entry_rate: dec!(0.65),
                first_period_months: 12,
                first_period_rates: SituationRates {
                    with_dependents: dec!(0.60),
                    living_alone: dec!(0.60),
                    cohabiting: dec!(0.55),
                },
                extension_months_per_year: 2,
                max_first_period_months: 48,
                second_period_rates: SituationRates {
                    with_dependents: dec!(0.55),
                    living_alone: dec!(0.50),
                    cohabiting: dec!(0.40),
                },
                withholding_rate: dec!(0.1009),
                estimated_net_salary_ratio: dec!(0.67),
            },
            eligibility: EligibilityConfig {
                min_age: 16,
                max_age: 100,
                work_requirements: vec![
                    WorkRequirement::new(0, 312, 21),
                    WorkRequirement::new(36, 468, 33),
                    WorkRequirement::new(50, 624, 42),
                ],
                belgian_work_months_after_foreign_work: 3,
            },
        }
    }
}
