use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Household income ceiling used by every income-tested allowance.
///
/// The ceiling grows linearly with the number of people in the household:
/// `base + household_size × per_person`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeLimit {
    pub base: Decimal,
    pub per_person: Decimal,
}

impl IncomeLimit {
    pub fn limit(
        &self,
        household_size: u32,
    ) -> Decimal {
        self.base + Decimal::from(household_size) * self.per_person
    }
}
