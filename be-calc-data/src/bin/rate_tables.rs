use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use be_calc_core::TaxYearConfig;
use be_calc_data::{RateTableLoader, ScheduleLoader, write_summary};
use clap::Parser;

/// Validate a rate table and optionally apply CSV schedules to it.
///
/// Without `--file` the built-in table is used. The schedules CSV has the
/// columns:
/// - tax_year: The assessment year (e.g., 2026)
/// - schedule: income_tax or self_employed
/// - upper_bound: Upper limit of the band (empty for the last band)
/// - rate: The rate inside the band as a decimal (e.g., 0.25)
#[derive(Parser, Debug)]
#[command(name = "rate-tables")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a TOML rate table
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a CSV file with bracket and contribution schedules
    #[arg(short, long)]
    schedules: Option<PathBuf>,

    /// Write the resulting table as TOML to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.file {
        Some(path) => {
            println!("Loading rate table from: {}", path.display());
            RateTableLoader::from_file(path)
                .with_context(|| format!("Failed to load rate table: {}", path.display()))?
        }
        None => {
            println!("Using built-in rate table.");
            TaxYearConfig::flanders_2026()
        }
    };

    if let Some(path) = &args.schedules {
        println!("Applying schedules from: {}", path.display());
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = ScheduleLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        println!("Parsed {} records from CSV", records.len());

        config = ScheduleLoader::apply(&config, &records)
            .context("Failed to apply schedules to rate table")?;
    }

    let mut stdout = io::stdout();
    writeln!(stdout)?;
    write_summary(&mut stdout, &config)?;

    if let Some(path) = &args.output {
        let text = RateTableLoader::to_toml_string(&config)?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write: {}", path.display()))?;
        println!("Wrote rate table to: {}", path.display());
    }

    Ok(())
}
