mod child;
mod contribution_tier;
mod family_situation;
mod income_limit;
mod occupation_status;
mod tax_bracket;
mod tax_free_allowance;

pub use child::{ChildRecord, FamilyContext};
pub use contribution_tier::ContributionTier;
pub use family_situation::FamilySituation;
pub use income_limit::IncomeLimit;
pub use occupation_status::OccupationStatus;
pub use tax_bracket::TaxBracket;
pub use tax_free_allowance::TaxFreeAllowance;
