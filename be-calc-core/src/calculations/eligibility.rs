//! Unemployment-benefit eligibility questionnaire.
//!
//! The questionnaire is a finite-state machine over a fixed list of
//! questions. Each required gate short-circuits: the first "no" ends the
//! questionnaire as [`EligibilityState::Ineligible`] and nothing after it is
//! asked. Foreign work is informational; only a "yes" leads to a follow-up
//! question, and only a "no" on that follow-up disqualifies.
//!
//! ```text
//! Age -> WorkedDays -> SalariedWork -> Involuntary -> FitForWork
//!     -> WillingToRegister -> ForeignWork --no--> Eligible
//!                                         --yes-> WorkedInBelgiumAfterForeignWork
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::error::InvalidInputError;
use crate::rates::RateTableError;

/// Days of work required from `min_age` on, within `reference_months`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRequirement {
    pub min_age: u32,
    pub required_days: u32,
    pub reference_months: u32,
}

impl WorkRequirement {
    pub fn new(
        min_age: u32,
        required_days: u32,
        reference_months: u32,
    ) -> Self {
        Self {
            min_age,
            required_days,
            reference_months,
        }
    }
}

/// Eligibility constants of one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Youngest accepted age answer.
    pub min_age: u32,
    /// Oldest accepted age answer.
    pub max_age: u32,
    /// Ascending by `min_age`.
    pub work_requirements: Vec<WorkRequirement>,
    /// Months of work in Belgium needed after working abroad.
    pub belgian_work_months_after_foreign_work: u32,
}

impl EligibilityConfig {
    /// # Errors
    ///
    /// Returns [`RateTableError::Inconsistent`] for an empty or unordered
    /// requirement table or an empty age range.
    pub fn validate(&self) -> Result<(), RateTableError> {
        if self.min_age > self.max_age {
            return Err(RateTableError::Inconsistent {
                field: "eligibility.min_age",
                message: format!(
                    "minimum age {} is above maximum age {}",
                    self.min_age, self.max_age
                ),
            });
        }
        if self.work_requirements.is_empty() {
            return Err(RateTableError::Inconsistent {
                field: "eligibility.work_requirements",
                message: "at least one requirement is needed".to_string(),
            });
        }
        for pair in self.work_requirements.windows(2) {
            if pair[1].min_age <= pair[0].min_age {
                return Err(RateTableError::Inconsistent {
                    field: "eligibility.work_requirements",
                    message: format!(
                        "age {} does not follow age {}",
                        pair[1].min_age, pair[0].min_age
                    ),
                });
            }
        }
        Ok(())
    }

    /// Requirement of the highest age band `age` has reached.
    ///
    /// Ages below the first band use the first band.
    pub fn requirement_for(
        &self,
        age: u32,
    ) -> WorkRequirement {
        self.work_requirements
            .iter()
            .rev()
            .find(|requirement| age >= requirement.min_age)
            .or(self.work_requirements.first())
            .copied()
            .unwrap_or_default()
    }
}

/// What kind of answer a question takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerKind {
    Number,
    YesNo,
}

/// Questions in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionId {
    Age,
    WorkedDays,
    SalariedWork,
    Involuntary,
    FitForWork,
    WillingToRegister,
    ForeignWork,
    WorkedInBelgiumAfterForeignWork,
}

impl QuestionId {
    /// Every question, in asking order. The last one is only asked after a
    /// "yes" on [`QuestionId::ForeignWork`].
    pub const ALL: [QuestionId; 8] = [
        QuestionId::Age,
        QuestionId::WorkedDays,
        QuestionId::SalariedWork,
        QuestionId::Involuntary,
        QuestionId::FitForWork,
        QuestionId::WillingToRegister,
        QuestionId::ForeignWork,
        QuestionId::WorkedInBelgiumAfterForeignWork,
    ];

    pub fn index(&self) -> usize {
        match self {
            Self::Age => 0,
            Self::WorkedDays => 1,
            Self::SalariedWork => 2,
            Self::Involuntary => 3,
            Self::FitForWork => 4,
            Self::WillingToRegister => 5,
            Self::ForeignWork => 6,
            Self::WorkedInBelgiumAfterForeignWork => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::WorkedDays => "worked-days",
            Self::SalariedWork => "salaried-work",
            Self::Involuntary => "involuntary",
            Self::FitForWork => "fit-for-work",
            Self::WillingToRegister => "willing-to-register",
            Self::ForeignWork => "foreign-work",
            Self::WorkedInBelgiumAfterForeignWork => "worked-in-belgium-after",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "age" | "leeftijd" => Some(Self::Age),
            "worked-days" | "gewerkteDagen" => Some(Self::WorkedDays),
            "salaried-work" | "typeArbeid" => Some(Self::SalariedWork),
            "involuntary" | "onvrijwillig" => Some(Self::Involuntary),
            "fit-for-work" | "arbeidsgeschikt" => Some(Self::FitForWork),
            "willing-to-register" | "ingeschreven" => Some(Self::WillingToRegister),
            "foreign-work" | "buitenlandswerk" => Some(Self::ForeignWork),
            "worked-in-belgium-after" | "workedInBelgiumAfter" => {
                Some(Self::WorkedInBelgiumAfterForeignWork)
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> AnswerKind {
        match self {
            Self::Age => AnswerKind::Number,
            _ => AnswerKind::YesNo,
        }
    }

    /// A "no" on a required gate ends the questionnaire.
    pub fn is_required_gate(&self) -> bool {
        matches!(
            self,
            Self::WorkedDays
                | Self::SalariedWork
                | Self::Involuntary
                | Self::FitForWork
                | Self::WillingToRegister
        )
    }

    /// Question text. The work-days question depends on the age answered.
    pub fn prompt(
        &self,
        config: &EligibilityConfig,
        age: Option<u32>,
    ) -> String {
        match self {
            Self::Age => "How old are you?".to_string(),
            Self::WorkedDays => {
                let requirement = config.requirement_for(age.unwrap_or(config.min_age));
                format!(
                    "Have you worked at least {} days in the last {} months?",
                    requirement.required_days, requirement.reference_months
                )
            }
            Self::SalariedWork => {
                "Was this salaried work with social-security contributions?".to_string()
            }
            Self::Involuntary => "Did you become unemployed involuntarily?".to_string(),
            Self::FitForWork => "Are you fit for work and available to work?".to_string(),
            Self::WillingToRegister => {
                "Are you willing to register as a job seeker with VDAB?".to_string()
            }
            Self::ForeignWork => "Have you (also) worked abroad?".to_string(),
            Self::WorkedInBelgiumAfterForeignWork => format!(
                "Did you work in Belgium for at least {} months after working abroad?",
                config.belgian_work_months_after_foreign_work
            ),
        }
    }

    /// Short guidance shown under the question.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Age => "Determines how many days of work are required.",
            Self::WorkedDays => {
                "Count full-time salaried days plus assimilated days such as sickness or holidays."
            }
            Self::SalariedWork => "Self-employed work does not count towards unemployment benefit.",
            Self::Involuntary => {
                "Dismissal or end of contract counts as involuntary; resigning does not."
            }
            Self::FitForWork => "You must be able to work and be available to the labour market.",
            Self::WillingToRegister => "Registration is mandatory to receive a benefit.",
            Self::ForeignWork => "Relevant when part of your work history was built up abroad.",
            Self::WorkedInBelgiumAfterForeignWork => {
                "Foreign work only counts after a period of work in Belgium."
            }
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An answer to one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Yes,
    No,
    Number(u32),
}

impl Answer {
    pub fn from_bool(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }

    /// Parses `yes`/`no` (English or Dutch) or a whole number.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "y" | "yes" | "j" | "ja" | "true" => Some(Self::Yes),
            "n" | "no" | "nee" | "false" => Some(Self::No),
            _ => s.parse().ok().map(Self::Number),
        }
    }

    fn kind(&self) -> AnswerKind {
        match self {
            Self::Number(_) => AnswerKind::Number,
            Self::Yes | Self::No => AnswerKind::YesNo,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Yes => f.write_str("yes"),
            Self::No => f.write_str("no"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Answers collected so far, in the order they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityAnswers {
    answers: Vec<(QuestionId, Answer)>,
}

impl EligibilityAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(
        mut self,
        question: QuestionId,
        answer: Answer,
    ) -> Self {
        self.push(question, answer);
        self
    }

    pub fn push(
        &mut self,
        question: QuestionId,
        answer: Answer,
    ) {
        self.answers.push((question, answer));
    }

    /// Latest answer given to `question`.
    pub fn get(
        &self,
        question: QuestionId,
    ) -> Option<Answer> {
        self.answers
            .iter()
            .rev()
            .find(|(q, _)| *q == question)
            .map(|(_, answer)| *answer)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(QuestionId, Answer)> {
        self.answers.iter()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    fn pop(&mut self) -> Option<(QuestionId, Answer)> {
        self.answers.pop()
    }
}

/// Thresholds that applied to an eligible person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilitySummary {
    pub age: u32,
    pub required_days: u32,
    pub reference_months: u32,
    pub worked_abroad: bool,
    /// Foreign work counts towards the required days.
    pub foreign_work_counts: bool,
}

/// Why the questionnaire ended as ineligible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IneligibilityReason {
    InsufficientWork {
        age: u32,
        required_days: u32,
        reference_months: u32,
    },
    NotSalaried,
    LeftVoluntarily,
    UnfitForWork,
    NotRegistering,
    ForeignWorkWithoutBelgianWork { required_months: u32 },
}

impl fmt::Display for IneligibilityReason {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::InsufficientWork {
                age,
                required_days,
                reference_months,
            } => write!(
                f,
                "You have not worked enough. At your age ({age}) you need at least \
                 {required_days} days of work within the last {reference_months} months."
            ),
            Self::NotSalaried => f.write_str(
                "Only salaried work with social-security contributions counts. \
                 Self-employed work gives no right to unemployment benefit.",
            ),
            Self::LeftVoluntarily => f.write_str(
                "Leaving a job voluntarily in principle gives no right to unemployment \
                 benefit. Exceptions exist; contact the payment agency for your situation.",
            ),
            Self::UnfitForWork => f.write_str(
                "You must be fit for work. If you are unable to work, apply for incapacity \
                 benefit through your health insurance fund instead.",
            ),
            Self::NotRegistering => f.write_str(
                "Registering as a job seeker with VDAB is mandatory to receive unemployment \
                 benefit.",
            ),
            Self::ForeignWorkWithoutBelgianWork { required_months } => write!(
                f,
                "Foreign work only counts after at least {required_months} months of work \
                 in Belgium."
            ),
        }
    }
}

/// State of the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityState {
    /// Waiting for the answer to `QuestionId::ALL[index]`.
    Asking(usize),
    Eligible(EligibilitySummary),
    Ineligible {
        question: QuestionId,
        reason: IneligibilityReason,
    },
}

impl EligibilityState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Asking(_))
    }
}

/// Misuse of the questionnaire.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EligibilityError {
    #[error("the questionnaire is already decided; restart to answer again")]
    AlreadyDecided,

    #[error("question {question} does not take the answer {answer}")]
    UnexpectedAnswer { question: QuestionId, answer: Answer },

    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error(transparent)]
    RateTable(#[from] RateTableError),
}

/// Interactive driver of the questionnaire.
///
/// # Example
///
/// ```
/// use be_calc_core::TaxYearConfig;
/// use be_calc_core::calculations::eligibility::{
///     Answer, EligibilityChecker, EligibilityState, QuestionId,
/// };
///
/// let tables = TaxYearConfig::flanders_2026();
/// let mut checker = EligibilityChecker::new(&tables.eligibility).unwrap();
///
/// checker.answer(Answer::Number(40)).unwrap();
/// let state = checker.answer(Answer::No).unwrap();
///
/// assert!(matches!(
///     state,
///     EligibilityState::Ineligible { question: QuestionId::WorkedDays, .. }
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct EligibilityChecker<'a> {
    config: &'a EligibilityConfig,
    state: EligibilityState,
    answers: EligibilityAnswers,
    age: Option<u32>,
}

impl<'a> EligibilityChecker<'a> {
    /// # Errors
    ///
    /// Returns [`EligibilityError::RateTable`] if the configuration is
    /// invalid.
    pub fn new(config: &'a EligibilityConfig) -> Result<Self, EligibilityError> {
        config.validate()?;
        Ok(Self {
            config,
            state: EligibilityState::Asking(0),
            answers: EligibilityAnswers::new(),
            age: None,
        })
    }

    pub fn state(&self) -> &EligibilityState {
        &self.state
    }

    pub fn answers(&self) -> &EligibilityAnswers {
        &self.answers
    }

    /// Question awaiting an answer, `None` once decided.
    pub fn current_question(&self) -> Option<QuestionId> {
        match self.state {
            EligibilityState::Asking(index) => QuestionId::ALL.get(index).copied(),
            _ => None,
        }
    }

    /// Text of the current question.
    pub fn prompt(&self) -> Option<String> {
        self.current_question()
            .map(|question| question.prompt(self.config, self.age))
    }

    /// Answers the current question and moves to the next state.
    ///
    /// # Errors
    ///
    /// - [`EligibilityError::AlreadyDecided`] once the state is terminal.
    /// - [`EligibilityError::UnexpectedAnswer`] for a number on a yes/no
    ///   question or the reverse.
    /// - [`EligibilityError::InvalidInput`] for an age out of range.
    ///
    /// The state is unchanged on error.
    pub fn answer(
        &mut self,
        answer: Answer,
    ) -> Result<&EligibilityState, EligibilityError> {
        let question = self
            .current_question()
            .ok_or(EligibilityError::AlreadyDecided)?;
        if question.kind() != answer.kind() {
            return Err(EligibilityError::UnexpectedAnswer { question, answer });
        }

        let next = match (question, answer) {
            (QuestionId::Age, Answer::Number(age)) => {
                InvalidInputError::require_in_range(
                    "age",
                    age,
                    self.config.min_age,
                    self.config.max_age,
                )?;
                self.age = Some(age);
                EligibilityState::Asking(question.index() + 1)
            }
            (QuestionId::ForeignWork, Answer::No) => {
                EligibilityState::Eligible(self.summary(false))
            }
            (QuestionId::ForeignWork, Answer::Yes) => {
                EligibilityState::Asking(QuestionId::WorkedInBelgiumAfterForeignWork.index())
            }
            (QuestionId::WorkedInBelgiumAfterForeignWork, Answer::Yes) => {
                EligibilityState::Eligible(self.summary(true))
            }
            (QuestionId::WorkedInBelgiumAfterForeignWork, Answer::No) => {
                EligibilityState::Ineligible {
                    question,
                    reason: IneligibilityReason::ForeignWorkWithoutBelgianWork {
                        required_months: self.config.belgian_work_months_after_foreign_work,
                    },
                }
            }
            (gate, Answer::No) => EligibilityState::Ineligible {
                question: gate,
                reason: self.gate_failure(gate),
            },
            (gate, _) => EligibilityState::Asking(gate.index() + 1),
        };

        debug!(%question, %answer, "eligibility question answered");
        self.answers.push(question, answer);
        self.state = next;
        Ok(&self.state)
    }

    /// Returns to the previously answered question, forgetting its answer.
    ///
    /// Does nothing before the first answer.
    ///
    /// # Errors
    ///
    /// Returns [`EligibilityError::AlreadyDecided`] once the state is
    /// terminal; use [`restart`](Self::restart) instead.
    pub fn back(&mut self) -> Result<&EligibilityState, EligibilityError> {
        if self.state.is_terminal() {
            return Err(EligibilityError::AlreadyDecided);
        }
        if let Some((question, _)) = self.answers.pop() {
            if question == QuestionId::Age {
                self.age = None;
            }
            self.state = EligibilityState::Asking(question.index());
        }
        Ok(&self.state)
    }

    /// Discards every answer and starts over.
    pub fn restart(&mut self) {
        self.state = EligibilityState::Asking(0);
        self.answers = EligibilityAnswers::new();
        self.age = None;
    }

    fn summary(
        &self,
        worked_abroad: bool,
    ) -> EligibilitySummary {
        let age = self.age.unwrap_or(self.config.min_age);
        let requirement = self.config.requirement_for(age);
        EligibilitySummary {
            age,
            required_days: requirement.required_days,
            reference_months: requirement.reference_months,
            worked_abroad,
            foreign_work_counts: worked_abroad,
        }
    }

    fn gate_failure(
        &self,
        gate: QuestionId,
    ) -> IneligibilityReason {
        match gate {
            QuestionId::SalariedWork => IneligibilityReason::NotSalaried,
            QuestionId::Involuntary => IneligibilityReason::LeftVoluntarily,
            QuestionId::FitForWork => IneligibilityReason::UnfitForWork,
            QuestionId::WillingToRegister => IneligibilityReason::NotRegistering,
            _ => {
                let age = self.age.unwrap_or(self.config.min_age);
                let requirement = self.config.requirement_for(age);
                IneligibilityReason::InsufficientWork {
                    age,
                    required_days: requirement.required_days,
                    reference_months: requirement.reference_months,
                }
            }
        }
    }
}

/// Result of replaying a list of answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub state: EligibilityState,
    /// Questions answered during the replay, in order.
    pub asked: Vec<QuestionId>,
}

impl EligibilityOutcome {
    /// Question still waiting for an answer, if the replay ran out of
    /// answers before a decision.
    pub fn pending_question(&self) -> Option<QuestionId> {
        match self.state {
            EligibilityState::Asking(index) => QuestionId::ALL.get(index).copied(),
            _ => None,
        }
    }
}

/// Replays `answers` through the questionnaire.
///
/// Each step looks up the answer to the current question, so the order of
/// `answers` does not matter and answers to questions that are never reached
/// are ignored. Stops at the first terminal state or the first question
/// without an answer.
///
/// # Errors
///
/// Returns the first [`EligibilityError`] raised by an answer.
pub fn evaluate_eligibility(
    answers: &EligibilityAnswers,
    config: &EligibilityConfig,
) -> Result<EligibilityOutcome, EligibilityError> {
    let mut checker = EligibilityChecker::new(config)?;
    let mut asked = Vec::new();

    while let Some(question) = checker.current_question() {
        let Some(answer) = answers.get(question) else {
            break;
        };
        checker.answer(answer)?;
        asked.push(question);
    }

    Ok(EligibilityOutcome {
        state: checker.state().clone(),
        asked,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::rates::TaxYearConfig;

    fn config() -> EligibilityConfig {
        TaxYearConfig::flanders_2026().eligibility
    }

    fn all_yes(age: u32) -> EligibilityAnswers {
        EligibilityAnswers::new()
            .with(QuestionId::Age, Answer::Number(age))
            .with(QuestionId::WorkedDays, Answer::Yes)
            .with(QuestionId::SalariedWork, Answer::Yes)
            .with(QuestionId::Involuntary, Answer::Yes)
            .with(QuestionId::FitForWork, Answer::Yes)
            .with(QuestionId::WillingToRegister, Answer::Yes)
    }

    // =========================================================================
    // EligibilityConfig tests
    // =========================================================================

    #[test]
    fn requirement_follows_age_bands() {
        let config = config();

        assert_eq!(config.requirement_for(16), WorkRequirement::new(0, 312, 21));
        assert_eq!(config.requirement_for(35), WorkRequirement::new(0, 312, 21));
        assert_eq!(config.requirement_for(36), WorkRequirement::new(36, 468, 33));
        assert_eq!(config.requirement_for(49), WorkRequirement::new(36, 468, 33));
        assert_eq!(config.requirement_for(50), WorkRequirement::new(50, 624, 42));
    }

    #[test]
    fn validate_rejects_empty_requirements() {
        let config = EligibilityConfig {
            work_requirements: Vec::new(),
            ..config()
        };

        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Answer / QuestionId tests
    // =========================================================================

    #[test]
    fn answer_parse() {
        assert_eq!(Answer::parse("yes"), Some(Answer::Yes));
        assert_eq!(Answer::parse(" Ja "), Some(Answer::Yes));
        assert_eq!(Answer::parse("nee"), Some(Answer::No));
        assert_eq!(Answer::parse("42"), Some(Answer::Number(42)));
        assert_eq!(Answer::parse("-3"), None);
        assert_eq!(Answer::parse("maybe"), None);
    }

    #[test]
    fn question_parse_accepts_both_spellings() {
        for question in QuestionId::ALL {
            assert_eq!(QuestionId::parse(question.as_str()), Some(question));
        }
        assert_eq!(QuestionId::parse("gewerkteDagen"), Some(QuestionId::WorkedDays));
        assert_eq!(QuestionId::parse("nope"), None);
    }

    #[test]
    fn question_index_matches_order() {
        for (index, question) in QuestionId::ALL.iter().enumerate() {
            assert_eq!(question.index(), index);
        }
    }

    #[test]
    fn worked_days_prompt_depends_on_age() {
        let config = config();

        assert_eq!(
            QuestionId::WorkedDays.prompt(&config, Some(52)),
            "Have you worked at least 624 days in the last 42 months?"
        );
        assert_eq!(
            QuestionId::WorkedDays.prompt(&config, None),
            "Have you worked at least 312 days in the last 21 months?"
        );
    }

    // =========================================================================
    // EligibilityChecker tests
    // =========================================================================

    #[test]
    fn checker_age_40_without_enough_days_stops_immediately() {
        let config = config();
        let mut checker = EligibilityChecker::new(&config).unwrap();

        checker.answer(Answer::Number(40)).unwrap();
        assert_eq!(
            checker.prompt().as_deref(),
            Some("Have you worked at least 468 days in the last 33 months?")
        );
        let state = checker.answer(Answer::No).unwrap().clone();

        let EligibilityState::Ineligible { question, reason } = state else {
            panic!("expected an ineligible state");
        };
        assert_eq!(question, QuestionId::WorkedDays);
        assert_eq!(
            reason,
            IneligibilityReason::InsufficientWork {
                age: 40,
                required_days: 468,
                reference_months: 33,
            }
        );
        let text = reason.to_string();
        assert!(text.contains("468 days"));
        assert!(text.contains("33 months"));
        assert_eq!(checker.current_question(), None);
        assert_eq!(checker.answers().len(), 2);
    }

    #[test]
    fn checker_rejects_input_once_decided() {
        let config = config();
        let mut checker = EligibilityChecker::new(&config).unwrap();
        checker.answer(Answer::Number(30)).unwrap();
        checker.answer(Answer::No).unwrap();

        assert_eq!(
            checker.answer(Answer::Yes),
            Err(EligibilityError::AlreadyDecided)
        );
        assert_eq!(checker.back(), Err(EligibilityError::AlreadyDecided));
    }

    #[test]
    fn checker_restart_clears_everything() {
        let config = config();
        let mut checker = EligibilityChecker::new(&config).unwrap();
        checker.answer(Answer::Number(30)).unwrap();
        checker.answer(Answer::No).unwrap();

        checker.restart();

        assert_eq!(checker.state(), &EligibilityState::Asking(0));
        assert!(checker.answers().is_empty());
        assert_eq!(checker.current_question(), Some(QuestionId::Age));
    }

    #[test]
    fn checker_back_forgets_last_answer() {
        let config = config();
        let mut checker = EligibilityChecker::new(&config).unwrap();
        checker.answer(Answer::Number(55)).unwrap();
        checker.answer(Answer::Yes).unwrap();

        checker.back().unwrap();

        assert_eq!(checker.current_question(), Some(QuestionId::WorkedDays));
        assert_eq!(checker.answers().len(), 1);

        checker.back().unwrap();
        checker.back().unwrap();

        assert_eq!(checker.current_question(), Some(QuestionId::Age));
        assert!(checker.answers().is_empty());
    }

    #[test]
    fn checker_rejects_wrong_answer_kind() {
        let config = config();
        let mut checker = EligibilityChecker::new(&config).unwrap();

        assert_eq!(
            checker.answer(Answer::Yes),
            Err(EligibilityError::UnexpectedAnswer {
                question: QuestionId::Age,
                answer: Answer::Yes,
            })
        );
        assert_eq!(checker.state(), &EligibilityState::Asking(0));
    }

    #[test]
    fn checker_rejects_age_out_of_range() {
        let config = config();
        let mut checker = EligibilityChecker::new(&config).unwrap();

        assert_eq!(
            checker.answer(Answer::Number(15)),
            Err(EligibilityError::InvalidInput(InvalidInputError::OutOfRange {
                field: "age",
                min: 16,
                max: 100,
                value: 15,
            }))
        );
        assert!(checker.answer(Answer::Number(101)).is_err());
        assert!(checker.answer(Answer::Number(100)).is_ok());
    }

    // =========================================================================
    // evaluate_eligibility tests
    // =========================================================================

    #[test]
    fn evaluate_all_gates_pass_without_foreign_work() {
        let answers = all_yes(52).with(QuestionId::ForeignWork, Answer::No);

        let outcome = evaluate_eligibility(&answers, &config()).unwrap();

        assert_eq!(
            outcome.state,
            EligibilityState::Eligible(EligibilitySummary {
                age: 52,
                required_days: 624,
                reference_months: 42,
                worked_abroad: false,
                foreign_work_counts: false,
            })
        );
        assert_eq!(outcome.asked.len(), 7);
    }

    #[test]
    fn evaluate_foreign_work_follow_up() {
        let counted = all_yes(28)
            .with(QuestionId::ForeignWork, Answer::Yes)
            .with(QuestionId::WorkedInBelgiumAfterForeignWork, Answer::Yes);
        let rejected = all_yes(28)
            .with(QuestionId::ForeignWork, Answer::Yes)
            .with(QuestionId::WorkedInBelgiumAfterForeignWork, Answer::No);

        let counted = evaluate_eligibility(&counted, &config()).unwrap();
        let rejected = evaluate_eligibility(&rejected, &config()).unwrap();

        assert!(matches!(
            counted.state,
            EligibilityState::Eligible(EligibilitySummary {
                foreign_work_counts: true,
                ..
            })
        ));
        assert_eq!(
            rejected.state,
            EligibilityState::Ineligible {
                question: QuestionId::WorkedInBelgiumAfterForeignWork,
                reason: IneligibilityReason::ForeignWorkWithoutBelgianWork {
                    required_months: 3,
                },
            }
        );
    }

    #[test]
    fn evaluate_reports_first_failing_gate() {
        let answers = EligibilityAnswers::new()
            .with(QuestionId::Age, Answer::Number(40))
            .with(QuestionId::WorkedDays, Answer::No)
            .with(QuestionId::SalariedWork, Answer::No)
            .with(QuestionId::Involuntary, Answer::No);

        let outcome = evaluate_eligibility(&answers, &config()).unwrap();

        assert!(matches!(
            outcome.state,
            EligibilityState::Ineligible {
                question: QuestionId::WorkedDays,
                ..
            }
        ));
        assert_eq!(outcome.asked, vec![QuestionId::Age, QuestionId::WorkedDays]);
    }

    #[test]
    fn evaluate_each_gate_short_circuits() {
        let gates = [
            (QuestionId::SalariedWork, IneligibilityReason::NotSalaried),
            (QuestionId::Involuntary, IneligibilityReason::LeftVoluntarily),
            (QuestionId::FitForWork, IneligibilityReason::UnfitForWork),
            (QuestionId::WillingToRegister, IneligibilityReason::NotRegistering),
        ];

        for (gate, expected) in gates {
            let answers = all_yes(30)
                .with(gate, Answer::No)
                .with(QuestionId::ForeignWork, Answer::No);

            let outcome = evaluate_eligibility(&answers, &config()).unwrap();

            assert_eq!(
                outcome.state,
                EligibilityState::Ineligible {
                    question: gate,
                    reason: expected,
                }
            );
            assert_eq!(outcome.asked.last(), Some(&gate));
            assert!(!outcome.asked.contains(&QuestionId::ForeignWork));
        }
    }

    #[test]
    fn evaluate_missing_answers_stay_pending() {
        let answers = EligibilityAnswers::new()
            .with(QuestionId::Age, Answer::Number(45))
            .with(QuestionId::WorkedDays, Answer::Yes);

        let outcome = evaluate_eligibility(&answers, &config()).unwrap();

        assert_eq!(outcome.state, EligibilityState::Asking(2));
        assert_eq!(outcome.pending_question(), Some(QuestionId::SalariedWork));
    }

    #[test]
    fn evaluate_propagates_invalid_age() {
        let answers = EligibilityAnswers::new().with(QuestionId::Age, Answer::Number(9));

        let result = evaluate_eligibility(&answers, &config());

        assert!(matches!(
            result,
            Err(EligibilityError::InvalidInput(InvalidInputError::OutOfRange { .. }))
        ));
    }
}
