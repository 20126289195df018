use std::collections::BTreeMap;

use tracing::debug;

use super::{RateTableError, TaxYearConfig};

/// Registry of [`TaxYearConfig`] tables, keyed by tax year.
///
/// Typical lifetime:
/// 1. Create with `RateTableRegistry::with_builtin()` (or `new()`).
/// 2. Call `register` for every table loaded from disk.
/// 3. Call `get` with the year the user selected.
#[derive(Debug, Clone, Default)]
pub struct RateTableRegistry {
    tables: BTreeMap<i32, TaxYearConfig>,
}

impl RateTableRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    /// Registry holding every table compiled into the crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        let builtin = TaxYearConfig::flanders_2026();
        registry.tables.insert(builtin.tax_year, builtin);
        registry
    }

    /// Validate and register a table.
    ///
    /// A table for the same year is replaced.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the table; the registry is left
    /// unchanged in that case.
    pub fn register(
        &mut self,
        config: TaxYearConfig,
    ) -> Result<(), RateTableError> {
        config.validate()?;
        debug!(tax_year = config.tax_year, "registered rate table");
        self.tables.insert(config.tax_year, config);
        Ok(())
    }

    /// Years with a registered table, ascending.
    pub fn available_years(&self) -> Vec<i32> {
        self.tables.keys().copied().collect()
    }

    /// Table for `year`.
    ///
    /// # Errors
    /// * [`RateTableError::UnknownTaxYear`] if nothing is registered for `year`.
    pub fn get(
        &self,
        year: i32,
    ) -> Result<&TaxYearConfig, RateTableError> {
        self.tables
            .get(&year)
            .ok_or_else(|| RateTableError::UnknownTaxYear {
                year,
                available: self.available_years(),
            })
    }

    /// Most recent registered table.
    pub fn latest(&self) -> Option<&TaxYearConfig> {
        self.tables.values().next_back()
    }
}
