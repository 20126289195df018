use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::rates::RateTableError;

/// Raised when a caller hands a calculator values outside its domain.
///
/// Inputs are checked before any arithmetic runs, so a calculation either
/// fails with one of these or produces a complete result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: Decimal },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },

    #[error("birth date {birth_date} lies after the evaluation date {evaluation_date}")]
    BirthDateAfterEvaluation {
        birth_date: NaiveDate,
        evaluation_date: NaiveDate,
    },
}

impl InvalidInputError {
    pub(crate) fn require_positive(
        field: &'static str,
        value: Decimal,
    ) -> Result<(), Self> {
        if value <= Decimal::ZERO {
            return Err(Self::NotPositive { field, value });
        }
        Ok(())
    }

    pub(crate) fn require_non_negative(
        field: &'static str,
        value: Decimal,
    ) -> Result<(), Self> {
        if value < Decimal::ZERO {
            return Err(Self::Negative { field, value });
        }
        Ok(())
    }

    pub(crate) fn require_in_range(
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    ) -> Result<(), Self> {
        if value < min || value > max {
            return Err(Self::OutOfRange {
                field,
                min,
                max,
                value,
            });
        }
        Ok(())
    }
}

/// Any reason a calculator can refuse to produce a result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    #[error("invalid rate table: {0}")]
    RateTable(#[from] RateTableError),
}
