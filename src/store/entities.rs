use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::validation::{
    parse_date, parse_nonnegative_int, parse_positive_int, validate_nonempty, ValidationError,
};

/// Column names of the activity file, in the order they are written.
pub const COLUMNS: [&str; 4] = ["date", "activity_type", "duration", "calories_burned"];

/// One logged exercise session. This is also the exact shape of a row in the activity file.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub activity_type: String,
    /// Minutes.
    pub duration: u32,
    pub calories_burned: u32,
}

impl ActivityRecord {
    pub fn new(
        date: NaiveDate,
        activity_type: impl Into<String>,
        duration: u32,
        calories_burned: u32,
    ) -> Self {
        Self {
            date,
            activity_type: activity_type.into(),
            duration,
            calories_burned,
        }
    }
}

/// Raw user input for a new activity, before validation.
#[derive(Debug, Clone, Default)]
pub struct NewActivity {
    pub date: String,
    pub activity_type: String,
    pub duration: String,
    pub calories_burned: String,
}

impl TryFrom<NewActivity> for ActivityRecord {
    type Error = ValidationError;

    fn try_from(
        NewActivity {
            date,
            activity_type,
            duration,
            calories_burned,
        }: NewActivity,
    ) -> Result<Self, Self::Error> {
        Ok(ActivityRecord {
            date: parse_date(&date)?,
            activity_type: validate_nonempty(&activity_type)?,
            duration: parse_positive_int(&duration)?,
            calories_burned: parse_nonnegative_int(&calories_burned)?,
        })
    }
}

/// A row as it was read from disk. Every field is kept as text so that a single bad cell only
/// costs its own row.
#[derive(Debug, Deserialize, Default)]
pub struct RawActivityRow {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub calories_burned: Option<String>,
}

impl RawActivityRow {
    /// Lenient conversion used during loading. Returns [None] if any of the fields is missing or
    /// can't be coerced.
    pub fn coerce(self) -> Option<ActivityRecord> {
        let activity_type = self.activity_type.filter(|v| !v.trim().is_empty())?;
        Some(ActivityRecord {
            date: coerce_date(self.date.as_deref()?)?,
            activity_type,
            duration: coerce_number(self.duration.as_deref()?)?,
            calories_burned: coerce_number(self.calories_burned.as_deref()?)?,
        })
    }
}

/// Accepts plain dates as well as timestamps, keeping only the calendar date.
fn coerce_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(date_time.date());
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(date_time.date());
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|v| v.date_naive())
}

/// Integers, or floats without a fractional part like `30.0`.
fn coerce_number(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Ok(v) = value.parse::<u32>() {
        return Some(v);
    }
    let v = value.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0. && v >= 0. && v <= u32::MAX as f64 {
        Some(v as u32)
    } else {
        None
    }
}
