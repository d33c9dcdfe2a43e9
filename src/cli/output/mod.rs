pub mod chart;

use crate::{
    analysis::summary::{ActivityTrend, DailySummary},
    store::entities::ActivityRecord,
    utils::time::format_date,
};

pub const NO_DATA: &str = "No data available.";

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Right,
}

/// Renders rows as space separated columns, padded to the widest cell. Each line ends with a
/// newline and has no trailing whitespace.
fn render_table(columns: &[(&str, Align)], rows: &[Vec<String>]) -> String {
    let mut widths = columns
        .iter()
        .map(|(name, _)| name.chars().count())
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = columns
        .iter()
        .map(|(name, _)| name.to_string())
        .collect::<Vec<_>>();

    let mut output = String::new();
    for row in std::iter::once(&header).chain(rows) {
        let line = row
            .iter()
            .zip(columns)
            .zip(&widths)
            .map(|((cell, (_, align)), &width)| match align {
                Align::Left => format!("{cell:<width$}"),
                Align::Right => format!("{cell:>width$}"),
            })
            .collect::<Vec<_>>()
            .join("  ");
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

pub fn render_records<'a>(records: impl IntoIterator<Item = &'a ActivityRecord>) -> String {
    let rows = records
        .into_iter()
        .map(|v| {
            vec![
                format_date(v.date),
                v.activity_type.clone(),
                v.duration.to_string(),
                v.calories_burned.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    render_table(
        &[
            ("date", Align::Left),
            ("activity_type", Align::Left),
            ("duration", Align::Right),
            ("calories_burned", Align::Right),
        ],
        &rows,
    )
}

pub fn render_daily_summary(summary: &[DailySummary]) -> String {
    let rows = summary
        .iter()
        .map(|v| {
            vec![
                format_date(v.date),
                v.total_duration.to_string(),
                v.total_calories.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    render_table(
        &[
            ("date", Align::Left),
            ("total_duration", Align::Right),
            ("total_calories", Align::Right),
        ],
        &rows,
    )
}

pub fn render_activity_trends(trends: &[ActivityTrend]) -> String {
    let rows = trends
        .iter()
        .map(|v| {
            vec![
                v.activity_type.clone(),
                format!("{:.2}", v.avg_duration),
                format!("{:.2}", v.avg_calories),
            ]
        })
        .collect::<Vec<_>>();
    render_table(
        &[
            ("activity_type", Align::Left),
            ("avg_duration", Align::Right),
            ("avg_calories", Align::Right),
        ],
        &rows,
    )
}
