//! Versioned rate tables.
//!
//! Every constant a calculator needs (bracket bounds, rates, thresholds,
//! benefit amounts) lives in a [`TaxYearConfig`]. Calculators receive the
//! table for the year being evaluated; adding a year means adding data, not
//! touching the algorithms.

mod flanders_2026;
mod registry;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::child_benefit::ChildBenefitConfig;
use crate::calculations::child_benefit_extras::ChildBenefitExtrasConfig;
use crate::calculations::eligibility::EligibilityConfig;
use crate::calculations::employee::EmployeeConfig;
use crate::calculations::income_tax::IncomeTaxConfig;
use crate::calculations::self_employed::SelfEmployedConfig;
use crate::calculations::unemployment::UnemploymentConfig;

pub use registry::RateTableRegistry;

/// Errors raised when a rate table is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    #[error("{schedule}: schedule has no bands")]
    EmptySchedule { schedule: &'static str },

    #[error("{schedule}: upper bound {bound} of band {index} is not above the previous bound")]
    BoundsNotIncreasing {
        schedule: &'static str,
        index: usize,
        bound: Decimal,
    },

    #[error("{schedule}: band {index} is unbounded but is not the last band")]
    UnboundedBandNotLast {
        schedule: &'static str,
        index: usize,
    },

    #[error("{schedule}: last band must be unbounded")]
    MissingUnboundedBand { schedule: &'static str },

    #[error("{schedule}: rate {rate} of band {index} is lower than the band before it")]
    DecreasingRate {
        schedule: &'static str,
        index: usize,
        rate: Decimal,
    },

    #[error("{field} must be between 0 and 1, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },

    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("{field} must be positive, got {value}")]
    NonPositiveAmount { field: &'static str, value: Decimal },

    #[error("{field}: {message}")]
    Inconsistent {
        field: &'static str,
        message: String,
    },

    #[error("no rate table for tax year {year}; available: {available:?}")]
    UnknownTaxYear { year: i32, available: Vec<i32> },
}

/// Rejects a fraction outside `[0, 1]`.
pub(crate) fn check_rate(
    field: &'static str,
    value: Decimal,
) -> Result<(), RateTableError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RateTableError::RateOutOfRange { field, value });
    }
    Ok(())
}

pub(crate) fn check_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), RateTableError> {
    if value < Decimal::ZERO {
        return Err(RateTableError::NegativeAmount { field, value });
    }
    Ok(())
}

pub(crate) fn check_positive(
    field: &'static str,
    value: Decimal,
) -> Result<(), RateTableError> {
    if value <= Decimal::ZERO {
        return Err(RateTableError::NonPositiveAmount { field, value });
    }
    Ok(())
}

/// All constants for one tax year.
///
/// `tax_year` is the assessment year: the 2026 table taxes income earned in
/// 2025.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,
    pub income_tax: IncomeTaxConfig,
    pub employee: EmployeeConfig,
    pub self_employed: SelfEmployedConfig,
    pub child_benefit: ChildBenefitConfig,
    pub child_benefit_extras: ChildBenefitExtrasConfig,
    pub unemployment: UnemploymentConfig,
    pub eligibility: EligibilityConfig,
}

impl TaxYearConfig {
    /// Validates every section of the table.
    ///
    /// # Errors
    ///
    /// Returns the first [`RateTableError`] found, checking sections in
    /// declaration order.
    pub fn validate(&self) -> Result<(), RateTableError> {
        self.income_tax.validate()?;
        self.employee.validate()?;
        self.self_employed.validate()?;
        self.child_benefit.validate()?;
        self.child_benefit_extras.validate()?;
        self.unemployment.validate()?;
        self.eligibility.validate()?;
        Ok(())
    }
}
