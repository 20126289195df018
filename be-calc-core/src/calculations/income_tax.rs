//! Personal income tax shared by the employee and self-employed calculators.
//!
//! Both calculators reduce gross pay by social contributions first and then
//! hand the remainder to [`IncomeTaxCalculator`], which runs the same five
//! steps:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Professional expenses: income × 30%, capped at 5930 |
//! | 2    | Tax-free allowance: 10910 + 1890 per dependent child |
//! | 3    | Taxable income: income − expenses − allowance, floored at 0 |
//! | 4    | Progressive tax over the bracket schedule |
//! | 5    | Municipal surcharge: 7% of the progressive tax |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::brackets::{
    BracketSlice, apply_brackets, bracket_breakdown, marginal_rate, validate_schedule,
};
use crate::calculations::common::round_half_up;
use crate::models::{TaxBracket, TaxFreeAllowance};
use crate::rates::{RateTableError, check_non_negative, check_rate};

/// Income-tax constants of one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxConfig {
    /// Progressive schedule applied to the taxable income.
    pub brackets: Vec<TaxBracket>,

    pub tax_free_allowance: TaxFreeAllowance,

    /// Share of income deducted as flat-rate professional expenses.
    pub professional_expense_rate: Decimal,

    /// Ceiling of the professional-expense deduction.
    pub professional_expense_cap: Decimal,

    /// Municipal surcharge as a fraction of the progressive tax.
    pub municipal_surcharge_rate: Decimal,
}

impl IncomeTaxConfig {
    /// # Errors
    ///
    /// Returns [`RateTableError`] if the bracket schedule is malformed or a
    /// rate or amount is outside its range.
    pub fn validate(&self) -> Result<(), RateTableError> {
        validate_schedule("income_tax.brackets", &self.brackets, true)?;
        check_non_negative(
            "income_tax.tax_free_allowance.base",
            self.tax_free_allowance.base,
        )?;
        check_non_negative(
            "income_tax.tax_free_allowance.per_dependent_child",
            self.tax_free_allowance.per_dependent_child,
        )?;
        check_rate(
            "income_tax.professional_expense_rate",
            self.professional_expense_rate,
        )?;
        check_non_negative(
            "income_tax.professional_expense_cap",
            self.professional_expense_cap,
        )?;
        check_rate(
            "income_tax.municipal_surcharge_rate",
            self.municipal_surcharge_rate,
        )?;
        Ok(())
    }
}

/// Every intermediate amount of the income-tax pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxBreakdown {
    /// Income after social contributions, before any deduction.
    pub income_before_expenses: Decimal,

    /// Flat-rate professional-expense deduction.
    pub professional_expenses: Decimal,

    pub income_after_expenses: Decimal,

    /// Tax-free allowance for the household.
    pub tax_free_allowance: Decimal,

    /// Base of the progressive tax, never negative.
    pub taxable_income: Decimal,

    /// Portion of the taxable income falling in each bracket.
    pub brackets: Vec<BracketSlice>,

    pub progressive_tax: Decimal,

    pub municipal_surcharge: Decimal,

    /// Progressive tax plus municipal surcharge.
    pub total_tax: Decimal,

    /// Rate of the bracket the taxable income ends in.
    pub marginal_rate: Decimal,
}

/// Runs the income-tax steps over a pre-computed income.
#[derive(Debug, Clone)]
pub struct IncomeTaxCalculator<'a> {
    config: &'a IncomeTaxConfig,
}

impl<'a> IncomeTaxCalculator<'a> {
    pub fn new(config: &'a IncomeTaxConfig) -> Self {
        Self { config }
    }

    /// Taxes `income` for a household with `dependent_children` children.
    ///
    /// `income` may be negative (a self-employed minimum contribution can
    /// exceed gross income); the tax is zero in that case.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableError`] if the configuration is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use be_calc_core::TaxYearConfig;
    /// use be_calc_core::calculations::income_tax::IncomeTaxCalculator;
    ///
    /// let tables = TaxYearConfig::flanders_2026();
    /// let breakdown = IncomeTaxCalculator::new(&tables.income_tax)
    ///     .calculate(dec!(36301.97), 0)
    ///     .unwrap();
    ///
    /// assert_eq!(breakdown.taxable_income, dec!(19461.97));
    /// assert_eq!(breakdown.total_tax, dec!(5890.13));
    /// ```
    pub fn calculate(
        &self,
        income: Decimal,
        dependent_children: u32,
    ) -> Result<IncomeTaxBreakdown, RateTableError> {
        self.config.validate()?;

        let income_before_expenses = round_half_up(income);
        let professional_expenses = self.professional_expenses(income_before_expenses);
        let income_after_expenses = round_half_up(income_before_expenses - professional_expenses);
        let tax_free_allowance = self.tax_free_allowance(dependent_children);
        let taxable_income = self.taxable_income(income_after_expenses, tax_free_allowance);
        let progressive_tax = apply_brackets(taxable_income, &self.config.brackets);
        let municipal_surcharge = self.municipal_surcharge(progressive_tax);
        let total_tax = round_half_up(progressive_tax + municipal_surcharge);

        debug!(
            taxable_income = %taxable_income,
            progressive_tax = %progressive_tax,
            municipal_surcharge = %municipal_surcharge,
            total_tax = %total_tax,
            "income tax computed"
        );

        Ok(IncomeTaxBreakdown {
            income_before_expenses,
            professional_expenses,
            income_after_expenses,
            tax_free_allowance,
            taxable_income,
            brackets: bracket_breakdown(taxable_income, &self.config.brackets),
            progressive_tax,
            municipal_surcharge,
            total_tax,
            marginal_rate: marginal_rate(taxable_income, &self.config.brackets),
        })
    }

    fn professional_expenses(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income < Decimal::ZERO {
            warn!(
                income = %income,
                "income after contributions is negative; no professional expenses"
            );
            return Decimal::ZERO;
        }

        let expenses = income * self.config.professional_expense_rate;
        round_half_up(expenses.min(self.config.professional_expense_cap))
    }

    fn tax_free_allowance(
        &self,
        dependent_children: u32,
    ) -> Decimal {
        round_half_up(self.config.tax_free_allowance.amount(dependent_children))
    }

    fn taxable_income(
        &self,
        income_after_expenses: Decimal,
        tax_free_allowance: Decimal,
    ) -> Decimal {
        let taxable = income_after_expenses - tax_free_allowance;
        if taxable <= Decimal::ZERO {
            warn!(
                income_after_expenses = %income_after_expenses,
                tax_free_allowance = %tax_free_allowance,
                "income does not exceed the tax-free allowance; no income tax due"
            );
            return Decimal::ZERO;
        }
        round_half_up(taxable)
    }

    fn municipal_surcharge(
        &self,
        progressive_tax: Decimal,
    ) -> Decimal {
        round_half_up(progressive_tax * self.config.municipal_surcharge_rate)
    }
}
