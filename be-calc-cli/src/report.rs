//! Plain-text rendering of calculation results.

use std::io::{self, Write};

use be_calc_core::calculations::child_benefit_extras::{
    CareSupplement, ChildcareAllowance, SchoolAllowance, StudyGrant,
};
use be_calc_core::calculations::eligibility::IneligibilityReason;
use be_calc_core::calculations::income_tax::IncomeTaxBreakdown;
use be_calc_core::{
    ChildBenefitSummary, EligibilityState, EmployeeResult, QuestionId, SelfEmployedResult,
    TaxYearConfig, UnemploymentResult,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::utils::{format_euro, format_percent, format_percent_change, format_rate};

/// A calculation re-run with the income changed by `percent` %.
#[derive(Debug, Clone, Serialize)]
pub struct Scenario<T> {
    pub percent: Decimal,
    pub result: T,
}

/// Result of a calculation together with its what-if scenarios.
#[derive(Debug, Clone, Serialize)]
pub struct WithScenarios<T> {
    pub result: T,
    pub what_if: Vec<Scenario<T>>,
}

/// Child benefit plus every extra allowance that was asked for.
#[derive(Debug, Clone, Serialize)]
pub struct ChildBenefitReport {
    pub benefits: ChildBenefitSummary,
    pub childcare: Option<ChildcareAllowance>,
    pub school_allowances: Vec<SchoolAllowance>,
    pub study_grant: Option<StudyGrant>,
    pub care_supplement: Option<CareSupplement>,
    /// Points were given but fell below the lowest band.
    pub care_points_below_minimum: bool,
}

fn line(
    out: &mut impl Write,
    label: &str,
    value: impl AsRef<str>,
) -> io::Result<()> {
    writeln!(out, "  {label:<38} {:>16}", value.as_ref())
}

fn heading(
    out: &mut impl Write,
    title: &str,
) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}

fn write_income_tax(
    out: &mut impl Write,
    tax: &IncomeTaxBreakdown,
) -> io::Result<()> {
    line(out, "Professional expenses", format_euro(-tax.professional_expenses))?;
    line(out, "Net taxable income", format_euro(tax.income_after_expenses))?;
    line(out, "Tax-free allowance", format_euro(-tax.tax_free_allowance))?;
    line(out, "Taxable income", format_euro(tax.taxable_income))?;
    for slice in tax.brackets.iter().filter(|s| !s.taxed_amount.is_zero()) {
        let band = match slice.upper_bound {
            Some(upper) => format!(
                "    {} to {} at {}",
                format_euro(slice.lower_bound),
                format_euro(upper),
                format_rate(slice.rate)
            ),
            None => format!(
                "    above {} at {}",
                format_euro(slice.lower_bound),
                format_rate(slice.rate)
            ),
        };
        line(out, &band, format_euro(slice.tax))?;
    }
    line(out, "Progressive tax", format_euro(tax.progressive_tax))?;
    line(out, "Municipal surcharge", format_euro(tax.municipal_surcharge))?;
    line(out, "Total income tax", format_euro(tax.total_tax))?;
    line(out, "Marginal rate", format_rate(tax.marginal_rate))
}

pub fn write_employee(
    out: &mut impl Write,
    report: &WithScenarios<EmployeeResult>,
) -> io::Result<()> {
    let result = &report.result;
    heading(out, "Employee net salary")?;
    line(out, "Gross monthly salary", format_euro(result.gross_monthly))?;
    line(out, "Gross annual salary", format_euro(result.gross_annual))?;
    line(out, "Social security", format_euro(-result.social_security))?;
    line(
        out,
        "Income after social security",
        format_euro(result.income_after_social_security),
    )?;
    write_income_tax(out, &result.income_tax)?;
    writeln!(out)?;
    line(out, "Net annual", format_euro(result.net_annual))?;
    line(out, "Net monthly", format_euro(result.net_monthly))?;
    line(out, "Net as share of gross", format_percent(result.net_percentage_of_gross))?;
    line(out, "Effective tax rate", format_percent(result.effective_tax_rate))?;

    if !report.what_if.is_empty() {
        writeln!(out)?;
        heading(out, "What if")?;
        for scenario in &report.what_if {
            let label = format!(
                "Salary {} ({} gross)",
                format_percent_change(scenario.percent),
                format_euro(scenario.result.gross_monthly)
            );
            line(out, &label, format_euro(scenario.result.net_monthly))?;
        }
    }
    Ok(())
}

pub fn write_self_employed(
    out: &mut impl Write,
    report: &WithScenarios<SelfEmployedResult>,
) -> io::Result<()> {
    let result = &report.result;
    heading(out, "Self-employed net income")?;
    line(out, "Occupation", result.status.label())?;
    line(out, "Gross annual income", format_euro(result.gross_annual))?;
    if result.exempt {
        line(out, "Social contributions", "exempt")?;
    } else {
        line(out, "Social contributions", format_euro(-result.social_contributions))?;
        if result.minimum_applied {
            line(
                out,
                "  (minimum contribution; tiered amount)",
                format_euro(result.tiered_contributions),
            )?;
        }
    }
    line(
        out,
        "Contributions as share of income",
        format_percent(result.effective_contribution_percentage),
    )?;
    line(
        out,
        "Income after contributions",
        format_euro(result.income_after_contributions),
    )?;
    write_income_tax(out, &result.income_tax)?;
    writeln!(out)?;
    line(out, "Net annual", format_euro(result.net_annual))?;
    line(out, "Net monthly", format_euro(result.net_monthly))?;
    line(out, "Net as share of gross", format_percent(result.net_percentage_of_gross))?;
    line(out, "Total levy rate", format_percent(result.effective_total_rate))?;

    if !report.what_if.is_empty() {
        writeln!(out)?;
        heading(out, "What if")?;
        for scenario in &report.what_if {
            let label = format!(
                "Income {} ({} gross)",
                format_percent_change(scenario.percent),
                format_euro(scenario.result.gross_annual)
            );
            line(out, &label, format_euro(scenario.result.net_annual))?;
        }
    }
    Ok(())
}

pub fn write_child_benefit(
    out: &mut impl Write,
    report: &ChildBenefitReport,
) -> io::Result<()> {
    let summary = &report.benefits;
    heading(out, &format!("Child benefit on {}", summary.evaluation_date))?;
    line(out, "Household income limit", format_euro(summary.income_limit))?;

    for (index, child) in summary.children.iter().enumerate() {
        writeln!(out)?;
        writeln!(
            out,
            "  Child {} (born {}, age {}, rank {})",
            index + 1,
            child.birth_date,
            child.age,
            child.birth_rank
        )?;
        if let Some(reason) = &child.no_entitlement {
            writeln!(out, "    {reason}")?;
            continue;
        }
        writeln!(out, "    {}", child.system.label())?;
        line(out, "  Base amount", format_euro(child.base_amount))?;
        if !child.income_supplement.is_zero() {
            line(out, "  Social supplement", format_euro(child.income_supplement))?;
        }
        if !child.age_supplement.is_zero() {
            line(out, "  Age supplement", format_euro(child.age_supplement))?;
        }
        if !child.disability_supplement.is_zero() {
            let label = if child.disability_is_estimate {
                "  Disability supplement (estimate)"
            } else {
                "  Disability supplement"
            };
            line(out, label, format_euro(child.disability_supplement))?;
        }
        line(out, "  Monthly total", format_euro(child.monthly_total))?;
        if !child.school_bonus.is_zero() {
            line(out, "  School bonus (yearly)", format_euro(child.school_bonus))?;
        }
    }

    writeln!(out)?;
    line(out, "Family total per month", format_euro(summary.total_monthly))?;
    line(out, "Family total per year", format_euro(summary.total_annual))?;

    let has_extras = report.childcare.is_some()
        || !report.school_allowances.is_empty()
        || report.study_grant.is_some()
        || report.care_supplement.is_some()
        || report.care_points_below_minimum;
    if !has_extras {
        return Ok(());
    }

    writeln!(out)?;
    heading(out, "Extra allowances")?;
    if let Some(childcare) = &report.childcare {
        line(
            out,
            &format!("Childcare ({} days/month)", childcare.days_per_month),
            format_euro(childcare.monthly),
        )?;
    }
    for school in &report.school_allowances {
        let label = format!("School allowance ({})", school.level.as_str());
        let value = match (school.entitled, school.doubled) {
            (false, _) => "not entitled".to_string(),
            (true, true) => format!("{} (doubled)", format_euro(school.amount)),
            (true, false) => format_euro(school.amount),
        };
        line(out, &label, value)?;
    }
    if let Some(grant) = &report.study_grant {
        let label = format!("Study grant ({})", grant.housing.as_str());
        let value = if grant.entitled {
            format_euro(grant.amount)
        } else {
            "not entitled".to_string()
        };
        line(out, &label, value)?;
    }
    if let Some(care) = &report.care_supplement {
        line(
            out,
            &format!("Care supplement ({} points)", care.points),
            format_euro(care.monthly),
        )?;
    } else if report.care_points_below_minimum {
        line(out, "Care supplement", "below minimum points")?;
    }
    Ok(())
}

pub fn write_unemployment(
    out: &mut impl Write,
    result: &UnemploymentResult,
) -> io::Result<()> {
    heading(out, "Unemployment benefit")?;
    line(out, "Family situation", result.family_situation.label())?;
    line(out, "Last gross monthly salary", format_euro(result.gross_salary))?;
    line(out, "Salary cap", format_euro(result.salary_cap))?;
    line(out, "Capped salary", format_euro(result.capped_salary))?;
    line(out, "Phase", result.phase.label())?;
    line(out, "First period length (months)", result.first_period_length.to_string())?;
    line(out, "Benefit rate", format_rate(result.benefit_rate))?;
    line(out, "Gross benefit", format_euro(result.gross_benefit))?;
    line(out, "Withholding tax", format_euro(-result.withholding))?;
    line(out, "Net benefit", format_euro(result.net_benefit))?;
    writeln!(out)?;
    line(out, "Estimated net salary", format_euro(result.estimated_net_salary))?;
    line(out, "Income loss", format_euro(result.income_loss))?;
    line(out, "Income loss share", format_percent(result.loss_percentage))
}

pub fn write_eligibility(
    out: &mut impl Write,
    state: &EligibilityState,
) -> io::Result<()> {
    match state {
        EligibilityState::Eligible(summary) => {
            writeln!(out, "You probably qualify for unemployment benefit.")?;
            writeln!(
                out,
                "Required: {} days of work within {} months (age {}).",
                summary.required_days, summary.reference_months, summary.age
            )?;
            if summary.foreign_work_counts {
                writeln!(out, "Your foreign work counts towards the required days.")?;
            }
            writeln!(out, "Apply through a payment agency after registering with VDAB.")
        }
        EligibilityState::Ineligible { question, reason } => {
            writeln!(out, "You probably do not qualify for unemployment benefit.")?;
            writeln!(out, "Decided by: {question}")?;
            writeln!(out, "{reason}")?;
            if matches!(reason, IneligibilityReason::LeftVoluntarily) {
                writeln!(out, "A temporary exclusion may apply instead of a full refusal.")?;
            }
            Ok(())
        }
        EligibilityState::Asking(index) => match QuestionId::ALL.get(*index) {
            Some(question) => writeln!(out, "Not decided yet: answer '{question}' is missing."),
            None => writeln!(out, "Not decided yet."),
        },
    }
}

pub fn write_tables(
    out: &mut impl Write,
    available: &[i32],
    config: &TaxYearConfig,
) -> io::Result<()> {
    let years: Vec<String> = available.iter().map(i32::to_string).collect();
    heading(out, &format!("Rate table {}", config.tax_year))?;
    line(out, "Available years", years.join(", "))?;

    writeln!(out, "  Income tax brackets")?;
    for bracket in &config.income_tax.brackets {
        let label = match bracket.upper_bound {
            Some(bound) => format!("    up to {}", format_euro(bound)),
            None => "    above".to_string(),
        };
        line(out, &label, format_rate(bracket.rate))?;
    }
    line(
        out,
        "Tax-free allowance",
        format_euro(config.income_tax.tax_free_allowance.base),
    )?;
    line(
        out,
        "  per dependent child",
        format_euro(config.income_tax.tax_free_allowance.per_dependent_child),
    )?;
    line(
        out,
        "Employee social security",
        format_rate(config.employee.social_security_rate),
    )?;

    writeln!(out, "  Self-employed contribution tiers")?;
    for tier in &config.self_employed.contribution_tiers {
        let label = match tier.upper_bound {
            Some(bound) => format!("    up to {}", format_euro(bound)),
            None => "    above".to_string(),
        };
        line(out, &label, format_rate(tier.rate))?;
    }
    line(
        out,
        "Minimum quarterly contribution",
        format_euro(config.self_employed.minimum_quarterly_contribution),
    )?;
    line(
        out,
        "Child benefit base (new system)",
        format_euro(config.child_benefit.new_system_base),
    )?;
    line(
        out,
        "Unemployment salary cap",
        format_euro(config.unemployment.salary_cap),
    )
}
