use chrono::NaiveDate;

use crate::{
    store::entities::ActivityRecord,
    validation::{parse_date, ValidationError},
};

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Parses both bounds. A range whose start is after its end is valid and matches nothing.
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Records with `start <= date <= end`, in their original order.
pub fn by_date_range(records: &[ActivityRecord], range: DateRange) -> Vec<&ActivityRecord> {
    records.iter().filter(|v| range.contains(v.date)).collect()
}

/// Records whose trimmed type equals `type_name`, ignoring case. Original order is kept.
pub fn by_activity_type<'a>(
    records: &'a [ActivityRecord],
    type_name: &str,
) -> Vec<&'a ActivityRecord> {
    let type_name = type_name.to_lowercase();
    records
        .iter()
        .filter(|v| v.activity_type.trim().to_lowercase() == type_name)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample() -> Vec<ActivityRecord> {
        vec![
            ActivityRecord::new(date(2), "Run", 40, 400),
            ActivityRecord::new(date(1), "Swim", 20, 150),
            ActivityRecord::new(date(1), "Run", 30, 300),
            ActivityRecord::new(date(3), " RUN ", 25, 250),
            ActivityRecord::new(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(), "run", 5, 50),
        ]
    }

    #[test]
    fn test_single_day_range_is_inclusive() {
        let records = sample();
        let range = DateRange::parse("2024-01-01", "2024-01-01").unwrap();

        let matched = by_date_range(&records, range);

        assert_eq!(matched, vec![&records[1], &records[2]]);
    }

    #[test]
    fn test_range_bounds() {
        let records = sample();
        let range = DateRange::parse("2024-01-01", "2024-01-02").unwrap();
        assert_eq!(
            by_date_range(&records, range),
            vec![&records[0], &records[1], &records[2]]
        );

        let reversed = DateRange::parse("2024-01-03", "2024-01-01").unwrap();
        assert!(by_date_range(&records, reversed).is_empty());
    }

    #[test]
    fn test_range_parse_failure() {
        assert_eq!(
            DateRange::parse("2024-01-01", "2024-02-30"),
            Err(ValidationError::InvalidFormat("2024-02-30".into()))
        );
        assert!(DateRange::parse("last week", "2024-01-01").is_err());
    }

    #[test]
    fn test_type_filter_ignores_case() {
        let records = sample();

        let matched = by_activity_type(&records, "run");

        assert_eq!(
            matched,
            vec![&records[0], &records[2], &records[3], &records[4]]
        );
        assert_eq!(by_activity_type(&records, "SWIM"), vec![&records[1]]);
        assert!(by_activity_type(&records, "Bike").is_empty());
        assert!(by_activity_type(&[], "Run").is_empty());
    }
}
