use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Pattern a phone number must contain: three digits, three digits, four
/// digits, dash-separated.
pub const PHONE_PATTERN: &str = "[0-9]{3}-[0-9]{3}-[0-9]{4}";

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("phone pattern is valid"));

/// Input does not contain a substring matching [`PHONE_PATTERN`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid phone format, please use format: 123-456-7890")]
pub struct ValidationError;

/// Check a raw input string for a phone number.
///
/// This is a substring *search*, not a full-string match: text around a
/// valid `NNN-NNN-NNNN` run is accepted, and callers persist the raw input
/// as-is. See DESIGN.md for why the looser policy is kept.
pub fn validate_phone(input: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(input) {
        Ok(())
    } else {
        Err(ValidationError)
    }
}
