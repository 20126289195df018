//! Runs a parsed command line against the selected rate table.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use be_calc_core::calculations::child_benefit_extras::ChildBenefitExtras;
use be_calc_core::calculations::eligibility::EligibilityError;
use be_calc_core::{
    Answer, EligibilityAnswers, EligibilityChecker, EligibilityState, EmployeeInput,
    FamilyContext, RateTableRegistry, SelfEmployedInput, TaxYearConfig, UnemploymentInput,
    calculate_child_benefits, calculate_employee_net, calculate_self_employed_net,
    calculate_unemployment_benefit, evaluate_eligibility,
};
use be_calc_data::RateTableLoader;
use chrono::Local;
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{
    ChildBenefitArgs, Cli, Command, EligibilityArgs, EmployeeArgs, GlobalArgs, OutputFormat,
    SelfEmployedArgs, UnemploymentArgs,
};
use crate::report::{self, ChildBenefitReport, Scenario, WithScenarios};
use crate::utils::format_percent_change;

/// Built-in tables plus every `--tables` file.
pub fn build_registry(global: &GlobalArgs) -> Result<RateTableRegistry> {
    let mut registry = RateTableRegistry::with_builtin();
    for path in &global.tables {
        let year = RateTableLoader::load_into(&mut registry, path)
            .with_context(|| format!("Failed to load rate table: {}", path.display()))?;
        info!(tax_year = year, path = %path.display(), "loaded rate table");
    }
    Ok(registry)
}

/// Table for `--year`, or the most recent one.
pub fn select_table<'r>(
    registry: &'r RateTableRegistry,
    year: Option<i32>,
) -> Result<&'r TaxYearConfig> {
    match year {
        Some(year) => Ok(registry.get(year)?),
        None => registry.latest().context("no rate table available"),
    }
}

/// Executes `cli`, reading interactive answers from `input` and writing the
/// report to `out`.
pub fn run(
    cli: &Cli,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let registry = build_registry(&cli.global)?;
    let tables = select_table(&registry, cli.global.year)?;
    debug!(tax_year = tables.tax_year, "selected rate table");
    let format = cli.global.format;

    match &cli.command {
        Command::Employee(args) => run_employee(args, tables, format, out),
        Command::SelfEmployed(args) => run_self_employed(args, tables, format, out),
        Command::ChildBenefit(args) => run_child_benefit(args, tables, format, out),
        Command::Unemployment(args) => run_unemployment(args, tables, format, out),
        Command::Eligibility(args) if args.answers.is_empty() => {
            run_eligibility_interactive(tables, format, input, out)
        }
        Command::Eligibility(args) => run_eligibility_answers(args, tables, format, out),
        Command::Tables => match format {
            OutputFormat::Json => write_json(out, tables),
            OutputFormat::Text => {
                report::write_tables(out, &registry.available_years(), tables)?;
                Ok(())
            }
        },
    }
}

fn write_json(
    out: &mut impl Write,
    value: &impl Serialize,
) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to write JSON")?;
    writeln!(out)?;
    Ok(())
}

fn run_employee(
    args: &EmployeeArgs,
    tables: &TaxYearConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let input = EmployeeInput::new(args.gross_monthly, args.children);
    let result = calculate_employee_net(&input, tables)?;

    let mut what_if = Vec::with_capacity(args.what_if.len());
    for &percent in &args.what_if {
        let adjusted = input.adjusted_by_percent(percent);
        let result = calculate_employee_net(&adjusted, tables)
            .with_context(|| format!("What-if at {} failed", format_percent_change(percent)))?;
        what_if.push(Scenario { percent, result });
    }

    let output = WithScenarios { result, what_if };
    match format {
        OutputFormat::Json => write_json(out, &output),
        OutputFormat::Text => Ok(report::write_employee(out, &output)?),
    }
}

fn run_self_employed(
    args: &SelfEmployedArgs,
    tables: &TaxYearConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let input = SelfEmployedInput::new(args.gross_annual, args.status, args.children);
    let result = calculate_self_employed_net(&input, tables)?;

    let mut what_if = Vec::with_capacity(args.what_if.len());
    for &percent in &args.what_if {
        let adjusted = input.adjusted_by_percent(percent);
        let result = calculate_self_employed_net(&adjusted, tables)
            .with_context(|| format!("What-if at {} failed", format_percent_change(percent)))?;
        what_if.push(Scenario { percent, result });
    }

    let output = WithScenarios { result, what_if };
    match format {
        OutputFormat::Json => write_json(out, &output),
        OutputFormat::Text => Ok(report::write_self_employed(out, &output)?),
    }
}

fn run_child_benefit(
    args: &ChildBenefitArgs,
    tables: &TaxYearConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let family = FamilyContext {
        gross_annual_family_income: args.family_income,
        household_size: args.household_size,
    };
    let evaluation_date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let benefits = calculate_child_benefits(&args.children, &family, evaluation_date, tables)?;

    let extras = ChildBenefitExtras::new(&tables.child_benefit_extras);
    let childcare = args
        .childcare_days
        .map(|days| extras.childcare_allowance(days))
        .transpose()?;
    let school_allowances = args
        .school_levels
        .iter()
        .map(|&level| extras.school_allowance(level, &family))
        .collect::<Result<Vec<_>, _>>()?;
    let study_grant = args
        .study_grant
        .map(|housing| extras.study_grant(housing, args.distance_km, &family))
        .transpose()?;
    let care_supplement = args.care_points.and_then(|points| extras.care_supplement(points));

    let output = ChildBenefitReport {
        benefits,
        childcare,
        school_allowances,
        study_grant,
        care_points_below_minimum: args.care_points.is_some() && care_supplement.is_none(),
        care_supplement,
    };
    match format {
        OutputFormat::Json => write_json(out, &output),
        OutputFormat::Text => Ok(report::write_child_benefit(out, &output)?),
    }
}

fn run_unemployment(
    args: &UnemploymentArgs,
    tables: &TaxYearConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let input = UnemploymentInput {
        last_gross_monthly_salary: args.last_gross_monthly,
        family_situation: args.situation,
        months_unemployed: args.months,
        years_of_experience: args.experience,
    };
    let result = calculate_unemployment_benefit(&input, tables)?;

    match format {
        OutputFormat::Json => write_json(out, &result),
        OutputFormat::Text => Ok(report::write_unemployment(out, &result)?),
    }
}

fn run_eligibility_answers(
    args: &EligibilityArgs,
    tables: &TaxYearConfig,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let answers = args
        .answers
        .iter()
        .fold(EligibilityAnswers::new(), |answers, &(question, answer)| {
            answers.with(question, answer)
        });
    let outcome = evaluate_eligibility(&answers, &tables.eligibility)?;

    match format {
        OutputFormat::Json => write_json(out, &outcome),
        OutputFormat::Text => Ok(report::write_eligibility(out, &outcome.state)?),
    }
}

/// Asks the questions one by one on `input`.
///
/// Besides answers, `back` returns to the previous question and `restart`
/// starts over.
fn run_eligibility_interactive(
    tables: &TaxYearConfig,
    format: OutputFormat,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let mut checker = EligibilityChecker::new(&tables.eligibility)?;
    let mut line = String::new();

    while let (Some(question), Some(prompt)) = (checker.current_question(), checker.prompt()) {
        writeln!(out, "{prompt}")?;
        writeln!(out, "  ({})", question.hint())?;
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            bail!("input ended before question '{question}' was answered");
        }

        match line.trim().to_ascii_lowercase().as_str() {
            "back" => {
                checker.back()?;
                continue;
            }
            "restart" => {
                checker.restart();
                continue;
            }
            _ => {}
        }

        let Some(answer) = Answer::parse(&line) else {
            writeln!(out, "Please answer yes or no, or a number.")?;
            continue;
        };
        match checker.answer(answer) {
            Ok(_) => {}
            Err(err @ (EligibilityError::UnexpectedAnswer { .. }
            | EligibilityError::InvalidInput(_))) => {
                writeln!(out, "{err}")?;
            }
            Err(err) => return Err(err.into()),
        }
    }

    writeln!(out)?;
    let state: &EligibilityState = checker.state();
    match format {
        OutputFormat::Json => write_json(out, state),
        OutputFormat::Text => Ok(report::write_eligibility(out, state)?),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    fn run_args(
        args: &[&str],
        stdin: &str,
    ) -> Result<String> {
        let cli = Cli::try_parse_from(args)?;
        let mut out = Vec::new();
        run(&cli, &mut stdin.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    // ===== employee tests

    #[test]
    fn employee_json_contains_net() {
        let text = run_args(&["be-calc", "--format", "json", "employee", "3.000"], "").unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["result"]["gross_annual"], "41760.00");
        assert_eq!(value["what_if"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn employee_rejects_zero_salary() {
        assert!(run_args(&["be-calc", "employee", "0"], "").is_err());
    }

    #[test]
    fn unknown_year_is_an_error() {
        let err = run_args(&["be-calc", "--year", "1999", "tables"], "").unwrap_err();

        assert!(err.to_string().contains("1999"));
    }

    // ===== eligibility tests

    #[test]
    fn interactive_questionnaire_stops_at_first_failed_gate() {
        let text = run_args(&["be-calc", "eligibility"], "30\nyes\nno\n").unwrap();

        assert!(text.contains("How old are you?"));
        assert!(text.contains("You probably do not qualify"));
        assert!(!text.contains("Did you become unemployed involuntarily?"));
    }

    #[test]
    fn interactive_questionnaire_reasks_on_wrong_answer_type() {
        let text = run_args(
            &["be-calc", "eligibility"],
            "yes\n30\nyes\nyes\nyes\nyes\nyes\nno\n",
        )
        .unwrap();

        assert!(text.contains("does not take the answer"));
        assert!(text.contains("You probably qualify"));
    }

    #[test]
    fn interactive_questionnaire_supports_back() {
        let text = run_args(
            &["be-calc", "eligibility"],
            "30\nback\n60\nyes\nyes\nyes\nyes\nyes\nno\n",
        )
        .unwrap();

        assert!(text.contains("624 days of work within 42 months (age 60)"));
    }

    #[test]
    fn interactive_questionnaire_fails_on_eof() {
        let err = run_args(&["be-calc", "eligibility"], "30\n").unwrap_err();

        assert!(err.to_string().contains("worked-days"));
    }

    #[test]
    fn answers_flag_runs_without_stdin() {
        let text = run_args(
            &[
                "be-calc",
                "eligibility",
                "--answer",
                "age=52",
                "--answer",
                "worked-days=yes",
                "--answer",
                "salaried-work=yes",
                "--answer",
                "involuntary=no",
            ],
            "",
        )
        .unwrap();

        assert!(text.contains("Decided by: involuntary"));
    }
}
