//! Operator-specific grammar checks for raw filter input.
//!
//! Callers run these on every keystroke to render live diagnostics, so the
//! checks are pure and never touch the engine.

use crate::ledger::FilterHistoryEntry;
use crate::operator::Operator;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NUMBER_RE: Regex =
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid number regex");
}

/// Why a piece of input cannot be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRejection {
    Empty,
    LayerAlreadyFiltered,
    NotANumber,
    BetweenMissingComma,
    BetweenContainsSpace,
    BetweenWrongCount,
    BetweenNotNumeric,
    InSetWrongCount,
    InSetSpaceNearComma,
}

impl InputRejection {
    /// User-facing diagnostic, rendered verbatim.
    pub fn reason(&self) -> &'static str {
        match self {
            InputRejection::Empty => "No input value, please enter a valid value.",
            InputRejection::LayerAlreadyFiltered => {
                "Currently selected layer is already filtered. Please remove its active filter first."
            }
            InputRejection::NotANumber => {
                "The value entered is not a valid number, check for spaces or letters."
            }
            InputRejection::BetweenMissingComma => {
                "Input does not contain two values separated by a comma (,)."
            }
            InputRejection::BetweenContainsSpace => {
                "Input value contains a space, please remove any spaces between values or commas."
            }
            InputRejection::BetweenWrongCount => {
                "Two numbers not included in input, please enter two numbers separated by a comma."
            }
            InputRejection::BetweenNotNumeric => {
                "One of the values either side of the comma is empty or not a number."
            }
            InputRejection::InSetWrongCount => {
                "Input does not contain two values separated by a comma (,)."
            }
            InputRejection::InSetSpaceNearComma => {
                "Input value contains a space next to a comma, please remove spaces such as ' ,' or ', '."
            }
        }
    }
}

impl std::fmt::Display for InputRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

impl std::error::Error for InputRejection {}

/// True when `text` is a plain decimal number: no whitespace, no hex, no `inf`/`NaN`.
pub fn is_number(text: &str) -> bool {
    parse_number(text).is_some()
}

/// Parses `text` under the number grammar. Values that overflow to infinity are refused.
pub fn parse_number(text: &str) -> Option<f64> {
    if !NUMBER_RE.is_match(text) {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Checks raw input for `operator`. The first failing rule wins.
///
/// With both `layer_id` and `history`, a layer that already has an active
/// entry is rejected before the grammar is looked at.
pub fn validate(
    text: &str,
    operator: Operator,
    layer_id: Option<&str>,
    history: Option<&[FilterHistoryEntry]>,
) -> Result<(), InputRejection> {
    if text.is_empty() {
        return Err(InputRejection::Empty);
    }

    if let (Some(layer_id), Some(history)) = (layer_id, history) {
        if history.iter().any(|entry| entry.covers(layer_id)) {
            return Err(InputRejection::LayerAlreadyFiltered);
        }
    }

    match operator {
        Operator::LessThan | Operator::GreaterThan => {
            if is_number(text) {
                Ok(())
            } else {
                Err(InputRejection::NotANumber)
            }
        }
        Operator::Between => validate_between(text),
        Operator::InSet => validate_in_set(text),
        Operator::Equals => Ok(()),
    }
}

fn validate_between(text: &str) -> Result<(), InputRejection> {
    if !text.contains(',') {
        return Err(InputRejection::BetweenMissingComma);
    }
    if text.chars().any(char::is_whitespace) {
        return Err(InputRejection::BetweenContainsSpace);
    }
    let segments: Vec<&str> = text.split(',').collect();
    if segments.len() != 2 {
        return Err(InputRejection::BetweenWrongCount);
    }
    if !segments.iter().all(|segment| is_number(segment)) {
        return Err(InputRejection::BetweenNotNumeric);
    }
    Ok(())
}

// Exactly two members, even though the help text describes any number.
fn validate_in_set(text: &str) -> Result<(), InputRejection> {
    if text.split(',').count() != 2 {
        return Err(InputRejection::InSetWrongCount);
    }
    if text.contains(", ") || text.contains(" ,") {
        return Err(InputRejection::InSetSpaceNearComma);
    }
    Ok(())
}
