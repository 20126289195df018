use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A child as entered in the child-benefit questionnaire.
///
/// Age and benefit system are derived from `birth_date` on demand and are
/// never stored alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRecord {
    pub birth_date: NaiveDate,
    /// Only consulted once the child is 18 or older.
    pub is_studying: bool,
    pub has_recognized_disability: bool,
}

impl ChildRecord {
    pub fn new(birth_date: NaiveDate) -> Self {
        Self {
            birth_date,
            is_studying: false,
            has_recognized_disability: false,
        }
    }

    /// Completed years of age on `date`.
    ///
    /// Returns 0 when `date` lies before the birth date.
    pub fn age_on(
        &self,
        date: NaiveDate,
    ) -> u32 {
        let mut age = date.year() - self.birth_date.year();
        if (date.month(), date.day()) < (self.birth_date.month(), self.birth_date.day()) {
            age -= 1;
        }
        u32::try_from(age).unwrap_or(0)
    }

    /// Children born on or after `cutoff` fall under the new benefit system.
    pub fn uses_new_system(
        &self,
        cutoff: NaiveDate,
    ) -> bool {
        self.birth_date >= cutoff
    }
}

/// Household data shared by every child of the family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyContext {
    pub gross_annual_family_income: Decimal,
    pub household_size: u32,
}
