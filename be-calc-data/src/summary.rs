use std::io::{self, Write};

use be_calc_core::TaxYearConfig;
use rust_decimal::Decimal;

fn write_band(
    out: &mut impl Write,
    upper_bound: Option<Decimal>,
    rate: Decimal,
) -> io::Result<()> {
    match upper_bound {
        Some(bound) => writeln!(out, "  up to {:>12}  {rate}", bound.to_string()),
        None => writeln!(out, "  {:>18}  {rate}", "above"),
    }
}

/// Writes the banded schedules and eligibility ages of a validated table.
pub fn write_summary(
    out: &mut impl Write,
    config: &TaxYearConfig,
) -> io::Result<()> {
    writeln!(out, "Tax year {} is valid.", config.tax_year)?;

    writeln!(out, "Income tax brackets:")?;
    for bracket in &config.income_tax.brackets {
        write_band(out, bracket.upper_bound, bracket.rate)?;
    }

    writeln!(out, "Self-employed contribution tiers:")?;
    for tier in &config.self_employed.contribution_tiers {
        write_band(out, tier.upper_bound, tier.rate)?;
    }

    writeln!(
        out,
        "Eligibility age range: {} to {}",
        config.eligibility.min_age, config.eligibility.max_age
    )
}

#[cfg(test)]
mod tests {
    use be_calc_core::TaxBracket;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn render(config: &TaxYearConfig) -> String {
        let mut out = Vec::new();
        write_summary(&mut out, config).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn bands_are_right_aligned() {
        let mut config = TaxYearConfig::flanders_2026();
        config.income_tax.brackets = vec![
            TaxBracket::new(dec!(15200), dec!(0.25)),
            TaxBracket::unbounded(dec!(0.50)),
        ];

        let text = render(&config);

        assert!(text.contains("Income tax brackets:\n  up to        15200  0.25\n               above  0.50\n"));
    }
}
