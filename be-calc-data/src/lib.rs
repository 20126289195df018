//! Loading rate tables from disk.
//!
//! A full [`TaxYearConfig`](be_calc_core::TaxYearConfig) is stored as TOML.
//! Bracket and contribution schedules can additionally be maintained as
//! CSV and applied on top of a loaded table.

mod error;
mod rate_table;
mod schedule;
mod summary;

pub use error::RateTableLoaderError;
pub use rate_table::RateTableLoader;
pub use schedule::{ScheduleKind, ScheduleLoader, ScheduleRecord};
pub use summary::write_summary;
