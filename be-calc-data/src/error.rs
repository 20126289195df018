use std::path::PathBuf;

use be_calc_core::RateTableError;
use thiserror::Error;

/// Errors that can occur when loading rate tables.
#[derive(Debug, Error)]
pub enum RateTableLoaderError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(String),

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("No schedule rows for tax year {0}")]
    NoRowsForYear(i32),

    #[error("Invalid rate table: {0}")]
    RateTable(#[from] RateTableError),
}

impl From<csv::Error> for RateTableLoaderError {
    fn from(err: csv::Error) -> Self {
        RateTableLoaderError::CsvParse(err.to_string())
    }
}

impl From<toml::de::Error> for RateTableLoaderError {
    fn from(err: toml::de::Error) -> Self {
        RateTableLoaderError::TomlParse(err.to_string())
    }
}

impl From<toml::ser::Error> for RateTableLoaderError {
    fn from(err: toml::ser::Error) -> Self {
        RateTableLoaderError::TomlSerialize(err.to_string())
    }
}
