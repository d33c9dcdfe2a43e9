use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::store::entities::ActivityRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_duration: u64,
    pub total_calories: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityTrend {
    pub activity_type: String,
    pub avg_duration: f64,
    pub avg_calories: f64,
}

/// Sums duration and calories per day. One entry per distinct date, ascending by date.
pub fn daily_summary<'a>(
    records: impl IntoIterator<Item = &'a ActivityRecord>,
) -> Vec<DailySummary> {
    let mut days = BTreeMap::<NaiveDate, (u64, u64)>::new();
    for record in records {
        let (duration, calories) = days.entry(record.date).or_default();
        *duration += u64::from(record.duration);
        *calories += u64::from(record.calories_burned);
    }
    days.into_iter()
        .map(|(date, (total_duration, total_calories))| DailySummary {
            date,
            total_duration,
            total_calories,
        })
        .collect()
}

/// Mean duration and calories per activity type, ascending by type.
///
/// Types are grouped by their exact text, so `Run` and `run` are separate entries even though
/// [by_activity_type](super::filter::by_activity_type) treats them as the same activity.
pub fn activity_trends<'a>(
    records: impl IntoIterator<Item = &'a ActivityRecord>,
) -> Vec<ActivityTrend> {
    #[derive(Default)]
    struct Totals {
        count: u64,
        duration: u64,
        calories: u64,
    }

    let mut types = BTreeMap::<&str, Totals>::new();
    for record in records {
        let totals = types.entry(record.activity_type.as_str()).or_default();
        totals.count += 1;
        totals.duration += u64::from(record.duration);
        totals.calories += u64::from(record.calories_burned);
    }
    types
        .into_iter()
        .map(|(activity_type, totals)| ActivityTrend {
            activity_type: activity_type.to_string(),
            avg_duration: totals.duration as f64 / totals.count as f64,
            avg_calories: totals.calories as f64 / totals.count as f64,
        })
        .collect()
}

/// Number of records per activity type, most frequent first. Equal counts are ordered by type.
pub fn activity_counts<'a>(
    records: impl IntoIterator<Item = &'a ActivityRecord>,
) -> Vec<(String, usize)> {
    let mut counts = BTreeMap::<&str, usize>::new();
    for record in records {
        *counts.entry(record.activity_type.as_str()).or_default() += 1;
    }
    let mut counts = counts
        .into_iter()
        .map(|(activity_type, count)| (activity_type.to_string(), count))
        .collect::<Vec<_>>();
    // Stable sort keeps the alphabetical order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
