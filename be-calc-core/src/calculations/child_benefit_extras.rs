//! Allowances paid on top of the monthly child benefit.
//!
//! - childcare allowance per day of day care,
//! - school allowance by level of education (income tested),
//! - study grant for higher education (income tested),
//! - care supplement by medical-assessment points.
//!
//! School allowance and study grant are rounded to whole euros.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::child_benefit::validate_family;
use crate::calculations::common::{round_half_up, round_to_whole};
use crate::calculations::error::InvalidInputError;
use crate::models::{FamilyContext, IncomeLimit};
use crate::rates::{RateTableError, check_non_negative, check_positive};

/// Level of education for the school allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchoolLevel {
    Kindergarten,
    Primary,
    Secondary,
}

impl SchoolLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kindergarten => "kindergarten",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "kindergarten" | "kleuter" => Some(Self::Kindergarten),
            "primary" | "lager" => Some(Self::Primary),
            "secondary" | "secundair" => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Where a student lives during the academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HousingSituation {
    AtHome,
    StudentHousing,
}

impl HousingSituation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtHome => "at-home",
            Self::StudentHousing => "student-housing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "at-home" | "thuis" => Some(Self::AtHome),
            "student-housing" | "kot" => Some(Self::StudentHousing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildcareAllowanceConfig {
    pub daily_amount: Decimal,
    pub max_days_per_month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolAllowanceConfig {
    pub income_limit: IncomeLimit,
    pub kindergarten: Decimal,
    pub primary: Decimal,
    pub secondary: Decimal,
    /// Below this share of the income limit the amount is doubled.
    pub doubling_ratio: Decimal,
}

impl SchoolAllowanceConfig {
    fn amount_for(
        &self,
        level: SchoolLevel,
    ) -> Decimal {
        match level {
            SchoolLevel::Kindergarten => self.kindergarten,
            SchoolLevel::Primary => self.primary,
            SchoolLevel::Secondary => self.secondary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyGrantConfig {
    pub income_limit: IncomeLimit,
    /// Above `upper_factor × limit` no grant is paid.
    pub upper_factor: Decimal,
    /// Below `lower_factor × limit` the higher amount applies.
    pub lower_factor: Decimal,
    pub at_home_high: Decimal,
    pub at_home_low: Decimal,
    pub student_housing_high: Decimal,
    pub student_housing_low: Decimal,
    /// Added when the school is more than `distance_threshold_km` away.
    pub distance_bonus: Decimal,
    pub distance_threshold_km: u32,
}

/// Care supplement paid from `min_points` on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsBand {
    pub min_points: u32,
    pub monthly_amount: Decimal,
}

impl PointsBand {
    pub fn new(
        min_points: u32,
        monthly_amount: Decimal,
    ) -> Self {
        Self {
            min_points,
            monthly_amount,
        }
    }
}

/// Constants for the extra allowances of one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildBenefitExtrasConfig {
    pub childcare: ChildcareAllowanceConfig,
    pub school_allowance: SchoolAllowanceConfig,
    pub study_grant: StudyGrantConfig,
    /// Ascending by `min_points`.
    pub care_supplement: Vec<PointsBand>,
}

impl ChildBenefitExtrasConfig {
    /// # Errors
    ///
    /// Returns [`RateTableError`] for negative amounts, non-positive income
    /// limits or unordered care-supplement bands.
    pub fn validate(&self) -> Result<(), RateTableError> {
        check_non_negative(
            "child_benefit_extras.childcare.daily_amount",
            self.childcare.daily_amount,
        )?;

        let school = &self.school_allowance;
        check_positive(
            "child_benefit_extras.school_allowance.income_limit.base",
            school.income_limit.base,
        )?;
        check_non_negative(
            "child_benefit_extras.school_allowance.kindergarten",
            school.kindergarten,
        )?;
        check_non_negative(
            "child_benefit_extras.school_allowance.primary",
            school.primary,
        )?;
        check_non_negative(
            "child_benefit_extras.school_allowance.secondary",
            school.secondary,
        )?;
        check_non_negative(
            "child_benefit_extras.school_allowance.doubling_ratio",
            school.doubling_ratio,
        )?;

        let grant = &self.study_grant;
        check_positive(
            "child_benefit_extras.study_grant.income_limit.base",
            grant.income_limit.base,
        )?;
        for (field, value) in [
            ("child_benefit_extras.study_grant.upper_factor", grant.upper_factor),
            ("child_benefit_extras.study_grant.lower_factor", grant.lower_factor),
            ("child_benefit_extras.study_grant.at_home_high", grant.at_home_high),
            ("child_benefit_extras.study_grant.at_home_low", grant.at_home_low),
            (
                "child_benefit_extras.study_grant.student_housing_high",
                grant.student_housing_high,
            ),
            (
                "child_benefit_extras.study_grant.student_housing_low",
                grant.student_housing_low,
            ),
            ("child_benefit_extras.study_grant.distance_bonus", grant.distance_bonus),
        ] {
            check_non_negative(field, value)?;
        }

        for pair in self.care_supplement.windows(2) {
            if pair[1].min_points <= pair[0].min_points {
                return Err(RateTableError::Inconsistent {
                    field: "child_benefit_extras.care_supplement",
                    message: format!(
                        "{} points does not follow {} points",
                        pair[1].min_points, pair[0].min_points
                    ),
                });
            }
        }
        for band in &self.care_supplement {
            check_non_negative("child_benefit_extras.care_supplement", band.monthly_amount)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildcareAllowance {
    pub days_per_month: u32,
    pub monthly: Decimal,
    pub annual: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolAllowance {
    pub level: SchoolLevel,
    pub income_limit: Decimal,
    pub entitled: bool,
    /// Family income below the doubling share of the limit.
    pub doubled: bool,
    /// Yearly amount in whole euros.
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyGrant {
    pub housing: HousingSituation,
    pub income_limit: Decimal,
    pub entitled: bool,
    pub base_amount: Decimal,
    pub distance_bonus: Decimal,
    /// Yearly amount in whole euros.
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareSupplement {
    pub points: u32,
    pub monthly: Decimal,
    pub annual: Decimal,
}

/// Calculator for the extra child-benefit allowances.
#[derive(Debug, Clone)]
pub struct ChildBenefitExtras<'a> {
    config: &'a ChildBenefitExtrasConfig,
}

impl<'a> ChildBenefitExtras<'a> {
    pub fn new(config: &'a ChildBenefitExtrasConfig) -> Self {
        Self { config }
    }

    /// Allowance for `days_per_month` days of day care.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::OutOfRange`] when the number of days
    /// exceeds the days in a month.
    pub fn childcare_allowance(
        &self,
        days_per_month: u32,
    ) -> Result<ChildcareAllowance, InvalidInputError> {
        let config = &self.config.childcare;
        InvalidInputError::require_in_range(
            "days_per_month",
            days_per_month,
            0,
            config.max_days_per_month,
        )?;

        let monthly = round_half_up(Decimal::from(days_per_month) * config.daily_amount);
        Ok(ChildcareAllowance {
            days_per_month,
            monthly,
            annual: round_half_up(monthly * Decimal::from(12)),
        })
    }

    /// Yearly school allowance for a child at `level`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError`] for a negative income or an empty
    /// household.
    pub fn school_allowance(
        &self,
        level: SchoolLevel,
        family: &FamilyContext,
    ) -> Result<SchoolAllowance, InvalidInputError> {
        validate_family(family)?;
        let config = &self.config.school_allowance;
        let income = family.gross_annual_family_income;
        let income_limit = round_half_up(config.income_limit.limit(family.household_size));

        if income > income_limit {
            debug!(
                income = %income,
                income_limit = %income_limit,
                "income above school allowance limit"
            );
            return Ok(SchoolAllowance {
                level,
                income_limit,
                entitled: false,
                doubled: false,
                amount: Decimal::ZERO,
            });
        }

        let doubled = income < income_limit * config.doubling_ratio;
        let base = config.amount_for(level);
        let amount = if doubled { base * Decimal::TWO } else { base };

        Ok(SchoolAllowance {
            level,
            income_limit,
            entitled: true,
            doubled,
            amount: round_to_whole(amount),
        })
    }

    /// Yearly study grant for a student in higher education.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError`] for a negative income or an empty
    /// household.
    pub fn study_grant(
        &self,
        housing: HousingSituation,
        distance_km: u32,
        family: &FamilyContext,
    ) -> Result<StudyGrant, InvalidInputError> {
        validate_family(family)?;
        let config = &self.config.study_grant;
        let income = family.gross_annual_family_income;
        let income_limit = round_half_up(config.income_limit.limit(family.household_size));

        if income > income_limit * config.upper_factor {
            debug!(
                income = %income,
                income_limit = %income_limit,
                "income above study grant limit"
            );
            return Ok(StudyGrant {
                housing,
                income_limit,
                entitled: false,
                base_amount: Decimal::ZERO,
                distance_bonus: Decimal::ZERO,
                amount: Decimal::ZERO,
            });
        }

        let low_income = income < income_limit * config.lower_factor;
        let base_amount = match (housing, low_income) {
            (HousingSituation::AtHome, true) => config.at_home_high,
            (HousingSituation::AtHome, false) => config.at_home_low,
            (HousingSituation::StudentHousing, true) => config.student_housing_high,
            (HousingSituation::StudentHousing, false) => config.student_housing_low,
        };
        let far_away = distance_km > config.distance_threshold_km;
        let distance_bonus = if far_away && base_amount > Decimal::ZERO {
            config.distance_bonus
        } else {
            Decimal::ZERO
        };
        let amount = round_to_whole(base_amount + distance_bonus);

        Ok(StudyGrant {
            housing,
            income_limit,
            entitled: amount > Decimal::ZERO,
            base_amount,
            distance_bonus,
            amount,
        })
    }

    /// Care supplement for `points` awarded by the medical assessment.
    ///
    /// Returns `None` below the lowest band.
    pub fn care_supplement(
        &self,
        points: u32,
    ) -> Option<CareSupplement> {
        let band = self
            .config
            .care_supplement
            .iter()
            .rev()
            .find(|band| points >= band.min_points)?;

        Some(CareSupplement {
            points,
            monthly: band.monthly_amount,
            annual: round_half_up(band.monthly_amount * Decimal::from(12)),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::rates::TaxYearConfig;

    fn config() -> ChildBenefitExtrasConfig {
        TaxYearConfig::flanders_2026().child_benefit_extras
    }

    fn family(
        income: Decimal,
        household_size: u32,
    ) -> FamilyContext {
        FamilyContext {
            gross_annual_family_income: income,
            household_size,
        }
    }

    // =========================================================================
    // childcare_allowance tests
    // =========================================================================

    #[test]
    fn childcare_allowance_per_day() {
        let config = config();

        let result = ChildBenefitExtras::new(&config).childcare_allowance(18).unwrap();

        assert_eq!(
            result,
            ChildcareAllowance {
                days_per_month: 18,
                monthly: dec!(65.88),
                annual: dec!(790.56),
            }
        );
    }

    #[test]
    fn childcare_allowance_rejects_more_days_than_a_month() {
        let config = config();

        let result = ChildBenefitExtras::new(&config).childcare_allowance(32);

        assert_eq!(
            result,
            Err(InvalidInputError::OutOfRange {
                field: "days_per_month",
                min: 0,
                max: 31,
                value: 32,
            })
        );
    }

    // =========================================================================
    // school_allowance tests
    // =========================================================================

    #[test]
    fn school_allowance_doubles_for_low_income() {
        let config = config();
        let extras = ChildBenefitExtras::new(&config);

        // limit = 32000 + 4 × 3500 = 46000
        let low = extras
            .school_allowance(SchoolLevel::Primary, &family(dec!(20000), 4))
            .unwrap();
        let mid = extras
            .school_allowance(SchoolLevel::Primary, &family(dec!(23000), 4))
            .unwrap();

        assert_eq!(low.income_limit, dec!(46000));
        assert!(low.doubled);
        assert_eq!(low.amount, dec!(264));
        assert!(!mid.doubled);
        assert_eq!(mid.amount, dec!(132));
    }

    #[test]
    fn school_allowance_above_limit_is_not_entitled() {
        let config = config();

        let result = ChildBenefitExtras::new(&config)
            .school_allowance(SchoolLevel::Secondary, &family(dec!(46000.01), 4))
            .unwrap();

        assert!(!result.entitled);
        assert_eq!(result.amount, dec!(0));
    }

    #[test]
    fn school_allowance_zero_income_is_doubled() {
        let config = config();

        let result = ChildBenefitExtras::new(&config)
            .school_allowance(SchoolLevel::Kindergarten, &family(dec!(0), 2))
            .unwrap();

        assert_eq!(result.amount, dec!(226));
    }

    // =========================================================================
    // study_grant tests
    // =========================================================================

    #[test]
    fn study_grant_by_housing_and_income() {
        let config = config();
        let extras = ChildBenefitExtras::new(&config);

        // limit = 40000 + 3 × 5000 = 55000
        let home_low = extras
            .study_grant(HousingSituation::AtHome, 10, &family(dec!(20000), 3))
            .unwrap();
        let home_high = extras
            .study_grant(HousingSituation::AtHome, 10, &family(dec!(60000), 3))
            .unwrap();
        let kot_low = extras
            .study_grant(HousingSituation::StudentHousing, 10, &family(dec!(20000), 3))
            .unwrap();
        let kot_high = extras
            .study_grant(HousingSituation::StudentHousing, 10, &family(dec!(82500), 3))
            .unwrap();

        assert_eq!(home_low.amount, dec!(2000));
        assert_eq!(home_high.amount, dec!(500));
        assert_eq!(kot_low.amount, dec!(5000));
        assert_eq!(kot_high.amount, dec!(2500));
        assert!(kot_high.entitled);
    }

    #[test]
    fn study_grant_distance_bonus_above_threshold() {
        let config = config();
        let extras = ChildBenefitExtras::new(&config);

        let at_threshold = extras
            .study_grant(HousingSituation::AtHome, 30, &family(dec!(60000), 3))
            .unwrap();
        let far = extras
            .study_grant(HousingSituation::AtHome, 31, &family(dec!(60000), 3))
            .unwrap();

        assert_eq!(at_threshold.amount, dec!(500));
        assert_eq!(far.distance_bonus, dec!(500));
        assert_eq!(far.amount, dec!(1000));
    }

    #[test]
    fn study_grant_above_upper_limit_is_not_entitled() {
        let config = config();

        let result = ChildBenefitExtras::new(&config)
            .study_grant(HousingSituation::StudentHousing, 100, &family(dec!(82500.01), 3))
            .unwrap();

        assert!(!result.entitled);
        assert_eq!(result.amount, dec!(0));
        assert_eq!(result.distance_bonus, dec!(0));
    }

    // =========================================================================
    // care_supplement tests
    // =========================================================================

    #[test]
    fn care_supplement_by_points() {
        let config = config();
        let extras = ChildBenefitExtras::new(&config);

        let monthly = |points| extras.care_supplement(points).map(|c| c.monthly);

        assert_eq!(monthly(0), None);
        assert_eq!(monthly(5), None);
        assert_eq!(monthly(6), Some(dec!(100)));
        assert_eq!(monthly(8), Some(dec!(100)));
        assert_eq!(monthly(9), Some(dec!(200)));
        assert_eq!(monthly(12), Some(dec!(350)));
        assert_eq!(monthly(17), Some(dec!(500)));
        assert_eq!(monthly(18), Some(dec!(650)));
        assert_eq!(monthly(40), Some(dec!(650)));
    }

    #[test]
    fn care_supplement_annual_is_twelve_months() {
        let config = config();

        let result = ChildBenefitExtras::new(&config).care_supplement(10).unwrap();

        assert_eq!(result.annual, dec!(2400));
    }

    // =========================================================================
    // ChildBenefitExtrasConfig::validate tests
    // =========================================================================

    #[test]
    fn validate_rejects_unordered_care_bands() {
        let mut config = config();
        config.care_supplement.reverse();

        assert!(matches!(
            config.validate(),
            Err(RateTableError::Inconsistent {
                field: "child_benefit_extras.care_supplement",
                ..
            })
        ));
    }
}
