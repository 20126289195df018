//! Net salary of an employee.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross annual: gross monthly × 13.92 (holiday pay and end-of-year bonus) |
//! | 2    | Social security: gross annual × 13.07% |
//! | 3-7  | Income tax over the remainder, see [`income_tax`](super::income_tax) |
//! | 8    | Net annual: gross annual − social security − total tax |
//! | 9    | Net monthly: net annual / 12 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use be_calc_core::{EmployeeInput, TaxYearConfig, calculate_employee_net};
//!
//! let tables = TaxYearConfig::flanders_2026();
//! let input = EmployeeInput::new(dec!(3000), 0);
//!
//! let result = calculate_employee_net(&input, &tables).unwrap();
//!
//! assert_eq!(result.gross_annual, dec!(41760.00));
//! assert_eq!(result.net_monthly, dec!(2534.32));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{percentage_of, round_half_up};
use crate::calculations::error::{CalculationError, InvalidInputError};
use crate::calculations::income_tax::{IncomeTaxBreakdown, IncomeTaxCalculator};
use crate::rates::{RateTableError, TaxYearConfig, check_positive, check_rate};

/// Employee-specific constants of one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeConfig {
    /// Monthly salaries paid per year, including holiday pay and the
    /// end-of-year bonus.
    pub annualization_factor: Decimal,

    /// Flat employee social-security rate on the gross annual salary.
    pub social_security_rate: Decimal,
}

impl EmployeeConfig {
    /// # Errors
    ///
    /// Returns [`RateTableError`] if the factor is not positive or the rate
    /// lies outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), RateTableError> {
        check_positive(
            "employee.annualization_factor",
            self.annualization_factor,
        )?;
        check_rate("employee.social_security_rate", self.social_security_rate)?;
        Ok(())
    }
}

/// Questionnaire answers for the employee calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub gross_monthly_salary: Decimal,
    pub dependent_children: u32,
}

impl EmployeeInput {
    pub fn new(
        gross_monthly_salary: Decimal,
        dependent_children: u32,
    ) -> Self {
        Self {
            gross_monthly_salary,
            dependent_children,
        }
    }

    /// # Errors
    ///
    /// Returns [`InvalidInputError::NotPositive`] unless the salary is
    /// greater than zero.
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        InvalidInputError::require_positive("gross_monthly_salary", self.gross_monthly_salary)
    }

    /// Same household with the salary raised (or lowered, for a negative
    /// `percent`) by `percent` %, rounded to cents.
    pub fn adjusted_by_percent(
        &self,
        percent: Decimal,
    ) -> Self {
        Self {
            gross_monthly_salary: round_half_up(
                self.gross_monthly_salary * (Decimal::ONE + percent / Decimal::ONE_HUNDRED),
            ),
            ..self.clone()
        }
    }
}

/// Every amount of the employee gross-to-net calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeResult {
    pub gross_monthly: Decimal,

    /// Gross monthly × annualization factor.
    pub gross_annual: Decimal,

    pub social_security: Decimal,

    /// Gross annual minus social security; input of the income-tax steps.
    pub income_after_social_security: Decimal,

    pub income_tax: IncomeTaxBreakdown,

    pub net_annual: Decimal,

    pub net_monthly: Decimal,

    /// Net monthly as a percentage of gross monthly.
    pub net_percentage_of_gross: Decimal,

    /// Total tax as a percentage of gross annual.
    pub effective_tax_rate: Decimal,
}

/// Calculator for the employee gross-to-net pipeline.
#[derive(Debug, Clone)]
pub struct EmployeeNetCalculator<'a> {
    tables: &'a TaxYearConfig,
}

impl<'a> EmployeeNetCalculator<'a> {
    pub fn new(tables: &'a TaxYearConfig) -> Self {
        Self { tables }
    }

    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidInput`] for a non-positive salary
    /// and [`CalculationError::RateTable`] for a malformed table.
    pub fn calculate(
        &self,
        input: &EmployeeInput,
    ) -> Result<EmployeeResult, CalculationError> {
        input.validate()?;
        self.tables.employee.validate()?;

        let gross_monthly = round_half_up(input.gross_monthly_salary);
        let gross_annual = self.gross_annual(gross_monthly);
        let social_security = self.social_security(gross_annual);
        let income_after_social_security = round_half_up(gross_annual - social_security);

        let income_tax = IncomeTaxCalculator::new(&self.tables.income_tax)
            .calculate(income_after_social_security, input.dependent_children)?;

        let net_annual = round_half_up(gross_annual - social_security - income_tax.total_tax);
        let net_monthly = round_half_up(net_annual / Decimal::from(12));

        debug!(
            gross_annual = %gross_annual,
            social_security = %social_security,
            total_tax = %income_tax.total_tax,
            net_annual = %net_annual,
            "employee net salary computed"
        );

        Ok(EmployeeResult {
            gross_monthly,
            gross_annual,
            social_security,
            income_after_social_security,
            net_percentage_of_gross: percentage_of(net_monthly, gross_monthly),
            effective_tax_rate: percentage_of(income_tax.total_tax, gross_annual),
            income_tax,
            net_annual,
            net_monthly,
        })
    }

    fn gross_annual(
        &self,
        gross_monthly: Decimal,
    ) -> Decimal {
        round_half_up(gross_monthly * self.tables.employee.annualization_factor)
    }

    fn social_security(
        &self,
        gross_annual: Decimal,
    ) -> Decimal {
        round_half_up(gross_annual * self.tables.employee.social_security_rate)
    }
}

/// Computes the net salary of an employee.
///
/// # Errors
///
/// See [`EmployeeNetCalculator::calculate`].
pub fn calculate_employee_net(
    input: &EmployeeInput,
    tables: &TaxYearConfig,
) -> Result<EmployeeResult, CalculationError> {
    EmployeeNetCalculator::new(tables).calculate(input)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn tables() -> TaxYearConfig {
        TaxYearConfig::flanders_2026()
    }

    // =========================================================================
    // EmployeeConfig::validate tests
    // =========================================================================

    #[test]
    fn validate_rejects_zero_annualization_factor() {
        let config = EmployeeConfig {
            annualization_factor: dec!(0),
            ..tables().employee
        };

        assert_eq!(
            config.validate(),
            Err(RateTableError::NonPositiveAmount {
                field: "employee.annualization_factor",
                value: dec!(0),
            })
        );
    }

    // =========================================================================
    // EmployeeInput tests
    // =========================================================================

    #[test]
    fn input_rejects_zero_salary() {
        let input = EmployeeInput::new(dec!(0), 1);

        assert_eq!(
            input.validate(),
            Err(InvalidInputError::NotPositive {
                field: "gross_monthly_salary",
                value: dec!(0),
            })
        );
    }

    #[test]
    fn adjusted_by_percent_keeps_children() {
        let input = EmployeeInput::new(dec!(3000), 2);

        let adjusted = input.adjusted_by_percent(dec!(10));

        assert_eq!(adjusted, EmployeeInput::new(dec!(3300.00), 2));
    }

    #[test]
    fn adjusted_by_percent_raises_and_lowers() {
        let input = EmployeeInput::new(dec!(3000), 0);

        assert_eq!(input.adjusted_by_percent(dec!(-10)).gross_monthly_salary, dec!(2700.00));
        assert_eq!(input.adjusted_by_percent(dec!(20)).gross_monthly_salary, dec!(3600.00));
        assert_eq!(input.adjusted_by_percent(dec!(0)).gross_monthly_salary, dec!(3000));
    }

    #[test]
    fn adjusted_by_percent_lowered_salary_still_calculates() {
        let tables = tables();
        let input = EmployeeInput::new(dec!(3000), 0);

        let lowered = calculate_employee_net(&input.adjusted_by_percent(dec!(-10)), &tables).unwrap();

        assert_eq!(lowered.gross_monthly, dec!(2700.00));
        assert!(lowered.net_monthly > dec!(0));
    }

    // =========================================================================
    // calculate_employee_net tests
    // =========================================================================

    #[test]
    fn calculate_reference_scenario() {
        let input = EmployeeInput::new(dec!(3000), 0);

        let result = calculate_employee_net(&input, &tables()).unwrap();

        assert_eq!(result.gross_annual, dec!(41760.00));
        assert_eq!(result.social_security, dec!(5458.03));
        assert_eq!(result.income_after_social_security, dec!(36301.97));
        assert_eq!(result.income_tax.professional_expenses, dec!(5930.00));
        assert_eq!(result.income_tax.income_after_expenses, dec!(30371.97));
        assert_eq!(result.income_tax.tax_free_allowance, dec!(10910.00));
        assert_eq!(result.income_tax.taxable_income, dec!(19461.97));
        assert_eq!(result.income_tax.progressive_tax, dec!(5504.79));
        assert_eq!(result.income_tax.municipal_surcharge, dec!(385.34));
        assert_eq!(result.income_tax.total_tax, dec!(5890.13));
        assert_eq!(result.net_annual, dec!(30411.84));
        assert_eq!(result.net_monthly, dec!(2534.32));
        assert_eq!(result.net_percentage_of_gross, dec!(84.48));
        assert_eq!(result.effective_tax_rate, dec!(14.10));
    }

    #[test]
    fn calculate_net_is_below_gross() {
        let tables = tables();

        for salary in [dec!(1), dec!(950), dec!(2100.50), dec!(4800), dec!(25000)] {
            let result = calculate_employee_net(&EmployeeInput::new(salary, 0), &tables).unwrap();

            assert!(result.net_annual > dec!(0), "net not positive for {salary}");
            assert!(result.net_annual < result.gross_annual, "net not below gross for {salary}");
        }
    }

    #[test]
    fn calculate_children_increase_net() {
        let tables = tables();

        let none = calculate_employee_net(&EmployeeInput::new(dec!(3000), 0), &tables).unwrap();
        let two = calculate_employee_net(&EmployeeInput::new(dec!(3000), 2), &tables).unwrap();

        assert!(two.net_monthly > none.net_monthly);
        assert_eq!(two.social_security, none.social_security);
    }

    #[test]
    fn calculate_what_if_reruns_whole_pipeline() {
        let tables = tables();
        let input = EmployeeInput::new(dec!(3000), 0);

        let base = calculate_employee_net(&input, &tables).unwrap();
        let raised = calculate_employee_net(&input.adjusted_by_percent(dec!(20)), &tables).unwrap();

        assert_eq!(raised.gross_monthly, dec!(3600.00));
        assert!(raised.net_monthly > base.net_monthly);
        assert!(raised.income_tax.marginal_rate >= base.income_tax.marginal_rate);
    }

    #[test]
    fn calculate_rejects_negative_salary() {
        let input = EmployeeInput::new(dec!(-10), 0);

        let result = calculate_employee_net(&input, &tables());

        assert_eq!(
            result,
            Err(CalculationError::InvalidInput(InvalidInputError::NotPositive {
                field: "gross_monthly_salary",
                value: dec!(-10),
            }))
        );
    }

    #[test]
    fn calculate_rejects_broken_table() {
        let mut tables = tables();
        tables.employee.social_security_rate = dec!(1.5);

        let result = calculate_employee_net(&EmployeeInput::new(dec!(3000), 0), &tables);

        assert_eq!(
            result,
            Err(CalculationError::RateTable(RateTableError::RateOutOfRange {
                field: "employee.social_security_rate",
                value: dec!(1.5),
            }))
        );
    }
}
