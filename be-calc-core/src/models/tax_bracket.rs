use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of the progressive income-tax schedule.
///
/// `upper_bound` is the inclusive ceiling of the band; `None` marks the
/// open-ended top band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
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
