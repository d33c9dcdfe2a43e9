//! Parsing of user supplied fields. Every function here is pure, retrying is left to the caller.

use chrono::NaiveDate;
use thiserror::Error;

/// The only date format accepted from users.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidFormat(String),
    #[error("{0:?} is not a whole number")]
    NotAnInteger(String),
    #[error("{0} is not a positive number")]
    NotPositive(i64),
    #[error("{0} is negative")]
    Negative(i64),
    #[error("value can't be empty")]
    Empty,
}

/// Strict `YYYY-MM-DD` parse. Any other shape, including surrounding whitespace, is rejected.
pub fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    // chrono also accepts unpadded or signed fields like 2024-1-5, which we don't want.
    let well_formed = text.len() == 10
        && text
            .bytes()
            .enumerate()
            .all(|(index, byte)| match index {
                4 | 7 => byte == b'-',
                _ => byte.is_ascii_digit(),
            });
    if !well_formed {
        return Err(ValidationError::InvalidFormat(text.to_string()));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidFormat(text.to_string()))
}

fn parse_int(text: &str) -> Result<i64, ValidationError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger(text.to_string()))
}

/// Used for durations, which must be strictly above zero.
pub fn parse_positive_int(text: &str) -> Result<u32, ValidationError> {
    let value = parse_int(text)?;
    if value <= 0 {
        return Err(ValidationError::NotPositive(value));
    }
    u32::try_from(value).map_err(|_| ValidationError::NotAnInteger(text.to_string()))
}

/// Used for calories, zero is allowed.
pub fn parse_nonnegative_int(text: &str) -> Result<u32, ValidationError> {
    let value = parse_int(text)?;
    if value < 0 {
        return Err(ValidationError::Negative(value));
    }
    u32::try_from(value).map_err(|_| ValidationError::NotAnInteger(text.to_string()))
}

/// Returns the trimmed text, failing if nothing is left.
pub fn validate_nonempty(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Empty)
    } else {
        Ok(trimmed.to_string())
    }
}
