use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One tier of the self-employed social-contribution schedule.
///
/// Unlike [`TaxBracket`](super::TaxBracket), tier rates may decrease: income
/// above the last finite tier typically bears no contribution at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionTier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl ContributionTier {
    pub fn new(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}
