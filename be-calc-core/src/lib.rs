//! Calculation core for Belgian and Flemish personal-finance questionnaires.
//!
//! Every calculator is a pure function over a small input record and the
//! [`TaxYearConfig`] of the year being evaluated. Results carry every
//! intermediate amount, not just the final figure.

pub mod calculations;
pub mod models;
pub mod rates;

pub use calculations::child_benefit::{ChildBenefitResult, ChildBenefitSummary};
pub use calculations::eligibility::{
    Answer, EligibilityAnswers, EligibilityChecker, EligibilityOutcome, EligibilityState,
    QuestionId,
};
pub use calculations::employee::{EmployeeInput, EmployeeResult};
pub use calculations::self_employed::{SelfEmployedInput, SelfEmployedResult};
pub use calculations::unemployment::{UnemploymentInput, UnemploymentResult};
pub use calculations::{
    CalculationError, InvalidInputError, calculate_child_benefits, calculate_employee_net,
    calculate_self_employed_net, calculate_unemployment_benefit, evaluate_eligibility,
};
pub use models::*;
pub use rates::{RateTableError, RateTableRegistry, TaxYearConfig};
