//! Command-line definition of `be-calc`.

use std::path::PathBuf;

use be_calc_core::calculations::child_benefit_extras::{HousingSituation, SchoolLevel};
use be_calc_core::{Answer, ChildRecord, FamilySituation, OccupationStatus, QuestionId};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use crate::utils::parse_amount;

/// Belgian and Flemish personal-finance calculators.
///
/// Amounts accept Belgian (`3.000,50`) and plain (`3000.50`) notation.
#[derive(Debug, Parser)]
#[command(name = "be-calc", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Assessment year of the rate table; defaults to the latest available.
    #[arg(long, global = true)]
    pub year: Option<i32>,

    /// Extra rate table (TOML) to register; repeatable.
    #[arg(long = "tables", global = true)]
    pub tables: Vec<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Net salary of an employee from the gross monthly salary.
    Employee(EmployeeArgs),

    /// Net income of a self-employed person from the gross annual income.
    SelfEmployed(SelfEmployedArgs),

    /// Monthly child benefit (Groeipakket) and extra allowances.
    ChildBenefit(ChildBenefitArgs),

    /// Monthly unemployment benefit.
    Unemployment(UnemploymentArgs),

    /// Unemployment-benefit eligibility questionnaire.
    Eligibility(EligibilityArgs),

    /// Show the available rate tables and the selected one.
    Tables,
}

#[derive(Debug, Args)]
pub struct EmployeeArgs {
    /// Gross monthly salary.
    #[arg(value_parser = parse_amount)]
    pub gross_monthly: Decimal,

    /// Number of dependent children.
    #[arg(long, default_value_t = 0)]
    pub children: u32,

    /// Also show the result with the salary changed by this percentage
    /// (e.g. `10` or `-5`); repeatable.
    #[arg(long = "what-if", value_parser = parse_amount, allow_negative_numbers = true)]
    pub what_if: Vec<Decimal>,
}

#[derive(Debug, Args)]
pub struct SelfEmployedArgs {
    /// Gross annual professional income.
    #[arg(value_parser = parse_amount)]
    pub gross_annual: Decimal,

    /// Primary (hoofdberoep) or secondary (bijberoep) occupation.
    #[arg(long, value_parser = parse_occupation, default_value = "primary")]
    pub status: OccupationStatus,

    /// Number of dependent children.
    #[arg(long, default_value_t = 0)]
    pub children: u32,

    /// Also show the result with the income changed by this percentage;
    /// repeatable.
    #[arg(long = "what-if", value_parser = parse_amount, allow_negative_numbers = true)]
    pub what_if: Vec<Decimal>,
}

#[derive(Debug, Args)]
pub struct ChildBenefitArgs {
    /// Child as `YYYY-MM-DD[,studying][,disability]`; repeatable.
    #[arg(long = "child", value_parser = parse_child)]
    pub children: Vec<ChildRecord>,

    /// Gross annual family income.
    #[arg(long, value_parser = parse_amount)]
    pub family_income: Decimal,

    /// Number of people in the household.
    #[arg(long)]
    pub household_size: u32,

    /// Evaluation date; defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Days of day care per month, for the childcare allowance.
    #[arg(long)]
    pub childcare_days: Option<u32>,

    /// School level of a child, for the school allowance; repeatable.
    #[arg(long = "school-level", value_parser = parse_school_level)]
    pub school_levels: Vec<SchoolLevel>,

    /// Housing of a student in higher education, for the study grant.
    #[arg(long = "study-grant", value_parser = parse_housing)]
    pub study_grant: Option<HousingSituation>,

    /// Distance between home and campus in km, for the study grant.
    #[arg(long, default_value_t = 0)]
    pub distance_km: u32,

    /// Points awarded by the medical assessment, for the care supplement.
    #[arg(long)]
    pub care_points: Option<u32>,
}

#[derive(Debug, Args)]
pub struct UnemploymentArgs {
    /// Last gross monthly salary.
    #[arg(value_parser = parse_amount)]
    pub last_gross_monthly: Decimal,

    /// with-dependents, living-alone or cohabiting.
    #[arg(long, value_parser = parse_family_situation)]
    pub situation: FamilySituation,

    /// Completed months of unemployment.
    #[arg(long, default_value_t = 0)]
    pub months: u32,

    /// Years of work experience.
    #[arg(long, default_value_t = 0)]
    pub experience: u32,
}

#[derive(Debug, Args)]
pub struct EligibilityArgs {
    /// Answer as `question=value` (e.g. `age=30`, `fit-for-work=yes`);
    /// repeatable. Without answers the questionnaire runs interactively.
    #[arg(long = "answer", value_parser = parse_answer_pair)]
    pub answers: Vec<(QuestionId, Answer)>,
}

fn parse_occupation(s: &str) -> Result<OccupationStatus, String> {
    OccupationStatus::parse(&s.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown occupation status '{s}' (primary or secondary)"))
}

fn parse_family_situation(s: &str) -> Result<FamilySituation, String> {
    FamilySituation::parse(&s.to_ascii_lowercase()).ok_or_else(|| {
        let known: Vec<&str> = FamilySituation::all().iter().map(|f| f.as_str()).collect();
        format!("unknown family situation '{s}' (one of {})", known.join(", "))
    })
}

fn parse_school_level(s: &str) -> Result<SchoolLevel, String> {
    SchoolLevel::parse(&s.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown school level '{s}' (kindergarten, primary or secondary)"))
}

fn parse_housing(s: &str) -> Result<HousingSituation, String> {
    HousingSituation::parse(&s.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown housing '{s}' (at-home or student-housing)"))
}

/// Parses `YYYY-MM-DD[,studying][,disability]`.
pub fn parse_child(s: &str) -> Result<ChildRecord, String> {
    let mut parts = s.split(',').map(str::trim);
    let date = parts.next().unwrap_or_default();
    let birth_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| format!("invalid birth date '{date}': {e}"))?;

    let mut child = ChildRecord::new(birth_date);
    for flag in parts {
        match flag.to_ascii_lowercase().as_str() {
            "studying" | "studerend" => child.is_studying = true,
            "disability" | "handicap" => child.has_recognized_disability = true,
            other => return Err(format!("unknown child flag '{other}' (studying or disability)")),
        }
    }
    Ok(child)
}

/// Parses `question=value`.
pub fn parse_answer_pair(s: &str) -> Result<(QuestionId, Answer), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected question=value, got '{s}'"))?;
    let question = QuestionId::parse(id.trim()).ok_or_else(|| {
        let known: Vec<&str> = QuestionId::ALL.iter().map(|q| q.as_str()).collect();
        format!("unknown question '{id}' (one of {})", known.join(", "))
    })?;
    let answer = Answer::parse(value).ok_or_else(|| format!("invalid answer '{value}'"))?;
    Ok((question, answer))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_child_reads_flags() {
        let child = parse_child("2004-05-01, studying,disability").unwrap();

        assert_eq!(child.birth_date, NaiveDate::from_ymd_opt(2004, 5, 1).unwrap());
        assert!(child.is_studying);
        assert!(child.has_recognized_disability);
    }

    #[test]
    fn parse_child_rejects_unknown_flag() {
        assert!(parse_child("2004-05-01,married").is_err());
        assert!(parse_child("01/05/2004").is_err());
    }

    #[test]
    fn parse_answer_pair_reads_number_and_yes_no() {
        assert_eq!(parse_answer_pair("age=30").unwrap(), (QuestionId::Age, Answer::Number(30)));
        assert_eq!(
            parse_answer_pair("fit-for-work=ja").unwrap(),
            (QuestionId::FitForWork, Answer::Yes)
        );
        assert!(parse_answer_pair("age").is_err());
        assert!(parse_answer_pair("shoe-size=42").is_err());
    }
}
