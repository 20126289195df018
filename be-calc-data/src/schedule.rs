use std::io::Read;

use be_calc_core::{ContributionTier, TaxBracket, TaxYearConfig};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::RateTableLoaderError;

/// Which banded schedule of a rate table a CSV row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    /// Personal income tax brackets.
    IncomeTax,
    /// Self-employed social contribution tiers.
    SelfEmployed,
}

impl ScheduleKind {
    pub const ALL: [ScheduleKind; 2] = [ScheduleKind::IncomeTax, ScheduleKind::SelfEmployed];

    /// Name used in the `schedule` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleKind::IncomeTax => "income_tax",
            ScheduleKind::SelfEmployed => "self_employed",
        }
    }

    pub fn parse(schedule: &str) -> Result<Self, RateTableLoaderError> {
        let schedule = schedule.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == schedule)
            .ok_or_else(|| RateTableLoaderError::InvalidSchedule(schedule.to_string()))
    }
}

/// A single row of a schedules CSV file.
///
/// - `tax_year`: the assessment year the row applies to
/// - `schedule`: `income_tax` or `self_employed`
/// - `upper_bound`: upper limit of the band (empty for the last band)
/// - `rate`: rate applied inside the band as a decimal (e.g. 0.25)
///
/// Rows of one schedule must appear in ascending band order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScheduleRecord {
    pub tax_year: i32,
    pub schedule: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for banded schedules kept as CSV.
///
/// Schedules change more often than the rest of a rate table, so they can
/// be maintained separately and applied on top of a loaded
/// [`TaxYearConfig`].
pub struct ScheduleLoader;

impl ScheduleLoader {
    /// Parse schedule records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScheduleRecord>, RateTableLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ScheduleRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Return a copy of `config` with every schedule present in `records`
    /// replaced.
    ///
    /// Only rows for `config.tax_year` are used; a schedule without rows
    /// keeps its current bands. The updated table is validated as a whole
    /// before it is returned.
    pub fn apply(
        config: &TaxYearConfig,
        records: &[ScheduleRecord],
    ) -> Result<TaxYearConfig, RateTableLoaderError> {
        let mut brackets = Vec::new();
        let mut tiers = Vec::new();

        for record in records.iter().filter(|r| r.tax_year == config.tax_year) {
            match ScheduleKind::parse(&record.schedule)? {
                ScheduleKind::IncomeTax => brackets.push(TaxBracket {
                    upper_bound: record.upper_bound,
                    rate: record.rate,
                }),
                ScheduleKind::SelfEmployed => tiers.push(ContributionTier {
                    upper_bound: record.upper_bound,
                    rate: record.rate,
                }),
            }
        }

        if brackets.is_empty() && tiers.is_empty() {
            return Err(RateTableLoaderError::NoRowsForYear(config.tax_year));
        }

        let mut updated = config.clone();
        if !brackets.is_empty() {
            debug!(
                tax_year = config.tax_year,
                bands = brackets.len(),
                "replacing income tax brackets"
            );
            updated.income_tax.brackets = brackets;
        }
        if !tiers.is_empty() {
            debug!(
                tax_year = config.tax_year,
                bands = tiers.len(),
                "replacing self-employed contribution tiers"
            );
            updated.self_employed.contribution_tiers = tiers;
        }

        updated.validate()?;
        Ok(updated)
    }
}
