//! Calculators and the eligibility questionnaire.
//!
//! Each calculator is a leaf: it takes a plain input record and the rate
//! tables of one year and returns a result record with every intermediate
//! amount. They share only the bracket evaluator, the income-tax steps and
//! the rounding helpers.

pub mod brackets;
pub mod child_benefit;
pub mod child_benefit_extras;
pub mod common;
pub mod eligibility;
pub mod employee;
mod error;
pub mod income_tax;
pub mod self_employed;
pub mod unemployment;

pub use child_benefit::calculate_child_benefits;
pub use eligibility::evaluate_eligibility;
pub use employee::calculate_employee_net;
pub use error::{CalculationError, InvalidInputError};
pub use self_employed::calculate_self_employed_net;
pub use unemployment::calculate_unemployment_benefit;
