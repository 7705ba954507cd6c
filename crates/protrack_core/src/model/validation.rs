//! Field-level validation helpers shared by every record type.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

/// Validation error for model records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A required text field is empty after trimming.
    EmptyField(&'static str),
    /// A date field is not a canonical calendar date.
    InvalidDate { field: &'static str, value: String },
    /// A timestamp field is not RFC 3339.
    InvalidTimestamp { field: &'static str, value: String },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::InvalidDate { field, value } => {
                write!(f, "{field} must be a YYYY-MM-DD date, got `{value}`")
            }
            Self::InvalidTimestamp { field, value } => {
                write!(f, "{field} must be an RFC 3339 timestamp, got `{value}`")
            }
        }
    }
}

impl Error for ModelValidationError {}

/// Parses a canonical `YYYY-MM-DD` date.
///
/// Rejects non-padded forms such as `2024-1-5` that chrono alone would accept.
pub fn validate_date(field: &'static str, value: &str) -> Result<NaiveDate, ModelValidationError> {
    let invalid = || ModelValidationError::InvalidDate {
        field,
        value: value.to_string(),
    };
    if !ISO_DATE_RE.is_match(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::EmptyField(field));
    }
    Ok(())
}

pub(crate) fn validate_timestamp(
    field: &'static str,
    value: &str,
) -> Result<(), ModelValidationError> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|_| ModelValidationError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}
