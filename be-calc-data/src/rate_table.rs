use std::path::Path;

use be_calc_core::{RateTableRegistry, TaxYearConfig};
use tracing::debug;

use crate::RateTableLoaderError;

/// Loader for complete rate tables stored as TOML.
///
/// The TOML layout mirrors [`TaxYearConfig`] field for field. Decimal
/// values should be quoted strings so they are read without going
/// through a float.
pub struct RateTableLoader;

impl RateTableLoader {
    /// Parse and validate a rate table from TOML text.
    pub fn from_toml_str(text: &str) -> Result<TaxYearConfig, RateTableLoaderError> {
        let config: TaxYearConfig = toml::from_str(text)?;
        config.validate()?;

        debug!(tax_year = config.tax_year, "parsed rate table");
        Ok(config)
    }

    /// Read, parse and validate a rate table file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<TaxYearConfig, RateTableLoaderError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RateTableLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&text)
    }

    /// Load a table file and register it, replacing any table for the
    /// same year. Returns the tax year of the loaded table.
    pub fn load_into(
        registry: &mut RateTableRegistry,
        path: impl AsRef<Path>,
    ) -> Result<i32, RateTableLoaderError> {
        let config = Self::from_file(path)?;
        let tax_year = config.tax_year;
        registry.register(config)?;
        Ok(tax_year)
    }

    /// Render a table back to TOML, e.g. to bootstrap a new year from the
    /// built-in one.
    pub fn to_toml_string(config: &TaxYearConfig) -> Result<String, RateTableLoaderError> {
        Ok(toml::to_string_pretty(config)?)
    }
}

#[cfg(test)]
mod tests {
    use be_calc_core::RateTableError;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const FLANDERS_2026: &str = include_str!("../data/flanders_2026.toml");

    #[test]
    fn shipped_table_matches_builtin() {
        let config = RateTableLoader::from_toml_str(FLANDERS_2026).unwrap();

        assert_eq!(config, TaxYearConfig::flanders_2026());
    }

    #[test]
    fn builtin_table_survives_toml() {
        let builtin = TaxYearConfig::flanders_2026();

        let text = RateTableLoader::to_toml_string(&builtin).unwrap();
        let reloaded = RateTableLoader::from_toml_str(&text).unwrap();

        assert_eq!(reloaded, builtin);
    }

    #[test]
    fn rejects_invalid_table() {
        let text = FLANDERS_2026.replace(
            "social_security_rate = \"0.1307\"",
            "social_security_rate = \"1.307\"",
        );

        let err = RateTableLoader::from_toml_str(&text).unwrap_err();

        assert!(matches!(
            err,
            RateTableLoaderError::RateTable(RateTableError::RateOutOfRange {
                field: "employee.social_security_rate",
                value,
            }) if value == dec!(1.307)
        ));
    }

    #[test]
    fn rejects_missing_section() {
        let err = RateTableLoader::from_toml_str("tax_year = 2027\n").unwrap_err();

        assert!(matches!(err, RateTableLoaderError::TomlParse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RateTableLoader::from_file("does/not/exist.toml").unwrap_err();

        assert!(err.to_string().contains("does/not/exist.toml"));
    }

    #[test]
    fn load_into_rejects_missing_file_without_touching_registry() {
        let mut registry = RateTableRegistry::with_builtin();

        let result = RateTableLoader::load_into(&mut registry, "does/not/exist.toml");

        assert!(matches!(result, Err(RateTableLoaderError::Io { .. })));
        assert_eq!(registry.available_years(), vec![2026]);
    }
}
