use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income exempt from personal income tax, raised per dependent child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxFreeAllowance {
    pub base: Decimal,
    pub per_dependent_child: Decimal,
}

impl TaxFreeAllowance {
    /// Total allowance for a household with `dependent_children` children.
    pub fn amount(
        &self,
        dependent_children: u32,
    ) -> Decimal {
        self.base + Decimal::from(dependent_children) * self.per_dependent_child
    }
}
