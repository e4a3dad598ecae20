//! Shared validation helpers used by the section validators.

use regex::Regex;
use std::sync::LazyLock;

/// Gemini model ids: lowercase letters, digits, dots, and dashes.
static MODEL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9.\-]*$").unwrap());

/// Push an error if `value` is outside `[min, max]` (integer).
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is outside `[min, max]` (float).
pub(crate) fn validate_range_f64(
    errors: &mut Vec<String>,
    name: &str,
    value: f64,
    min: f64,
    max: f64,
) {
    if !(min..=max).contains(&value) {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is not a well-formed model id.
pub(crate) fn validate_model_id(errors: &mut Vec<String>, name: &str, value: &str) {
    if !MODEL_ID_RE.is_match(value) {
        errors.push(format!("{name} = {value:?} is not a valid model id"));
    }
}
