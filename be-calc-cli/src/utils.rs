use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error returned when a string cannot be parsed as an amount.
#[derive(Debug, Error)]
pub enum ParseAmountError {
    #[error("invalid amount '{0}': expected e.g. 3000.50, 3000,50 or 3.000,50")]
    Format(String),

    #[error("invalid amount '{input}': {source}")]
    Decimal {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

static GROUPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[1-9]\d{0,2}(\.\d{3})+(,\d+)?$").expect("grouped amount pattern is valid")
});
static COMMA_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+,\d+$").expect("comma amount pattern is valid"));
static PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("plain amount pattern is valid"));

/// Removes whitespace and a leading or trailing euro sign.
fn normalize_amount_input(s: &str) -> String {
    s.trim()
        .trim_start_matches('€')
        .trim_end_matches('€')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Parses an amount in Belgian or plain notation.
///
/// Accepted forms:
/// - `3000.50`: plain, dot as decimal separator
/// - `3000,50`: comma as decimal separator
/// - `3.000,50` / `1.234.567`: dots grouping thousands, optional comma decimals
///
/// A dot followed by exactly three digits after a non-zero leading group is
/// read as a thousands separator, so `3.000` is three thousand while `0.205`
/// and `3.5` keep their plain meaning.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);

    let canonical = if GROUPED.is_match(&normalized) {
        normalized.replace('.', "").replace(',', ".")
    } else if COMMA_DECIMAL.is_match(&normalized) {
        normalized.replace(',', ".")
    } else if PLAIN.is_match(&normalized) {
        normalized
    } else {
        tracing::warn!(input = %s, "amount not in a recognised notation");
        return Err(ParseAmountError::Format(s.to_string()));
    };

    canonical
        .parse()
        .map_err(|source| ParseAmountError::Decimal {
            input: s.to_string(),
            source,
        })
}

/// Formats an amount the Belgian way: `€ 3.000,50`.
pub fn format_euro(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("€ {sign}{grouped},{cents}")
}

/// Formats a percentage with a comma decimal separator: `14,10 %`.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2} %").replace('.', ",")
}

/// Formats a change in percent with an explicit sign: `+10,00 %`.
pub fn format_percent_change(value: Decimal) -> String {
    let text = format_percent(value);
    if value.is_sign_negative() && !value.is_zero() {
        text
    } else {
        format!("+{text}")
    }
}

/// Formats a rate given as a fraction (`0.25`) as a percentage.
pub fn format_rate(rate: Decimal) -> String {
    format_percent(rate * Decimal::ONE_HUNDRED)
}
