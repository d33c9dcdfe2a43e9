use chrono::NaiveDate;

use crate::validation::DATE_FORMAT;

/// This is the standard way of converting a date to a string in fittrack.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
