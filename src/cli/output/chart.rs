//! Text charts for the terminal.

use std::{collections::BTreeSet, fmt::Display};

use ansi_term::Colour;
use clap::ValueEnum;

use crate::{
    analysis::summary::{activity_counts, daily_summary},
    store::entities::ActivityRecord,
    utils::time::format_date,
};

pub const NO_DATA_TO_PLOT: &str = "No data to plot.";

const BAR_WIDTH: usize = 40;
const PLOT_WIDTH: usize = 50;
const PLOT_HEIGHT: usize = 12;
const MARKERS: [char; 8] = ['o', 'x', '+', '*', '#', '@', '%', '&'];
const PALETTE: [Colour; 6] = [
    Colour::Cyan,
    Colour::Yellow,
    Colour::Green,
    Colour::Purple,
    Colour::Red,
    Colour::Blue,
];

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ChartKind {
    /// Number of sessions per activity type
    Distribution,
    /// Total calories per day
    Calories,
    /// Duration against calories for every session
    Scatter,
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Distribution => write!(f, "distribution"),
            ChartKind::Calories => write!(f, "calories"),
            ChartKind::Scatter => write!(f, "scatter"),
        }
    }
}

pub fn render_chart(kind: ChartKind, records: &[ActivityRecord], colored: bool) -> String {
    match kind {
        ChartKind::Distribution => activity_distribution(records, colored),
        ChartKind::Calories => calories_over_time(records, colored),
        ChartKind::Scatter => duration_vs_calories(records, colored),
    }
}

pub fn activity_distribution(records: &[ActivityRecord], colored: bool) -> String {
    let bars = activity_counts(records)
        .into_iter()
        .map(|(activity_type, count)| (activity_type, count as u64))
        .collect::<Vec<_>>();
    bar_chart("Activity Frequency", &bars, colored)
}

pub fn calories_over_time(records: &[ActivityRecord], colored: bool) -> String {
    let bars = daily_summary(records)
        .into_iter()
        .map(|v| (format_date(v.date), v.total_calories))
        .collect::<Vec<_>>();
    bar_chart("Calories Burned Over Time", &bars, colored)
}

fn scale(value: u64, max: u64, span: usize) -> usize {
    if max == 0 {
        0
    } else {
        (value as f64 * span as f64 / max as f64).round() as usize
    }
}

fn bar_chart(title: &str, bars: &[(String, u64)], colored: bool) -> String {
    if bars.is_empty() {
        return format!("{NO_DATA_TO_PLOT}\n");
    }
    let label_width = bars
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let max = bars.iter().map(|(_, value)| *value).max().unwrap_or(0);

    let mut output = format!("{title}\n");
    for (label, value) in bars {
        // Anything above zero gets at least one block so it doesn't look like a missing value.
        let length = scale(*value, max, BAR_WIDTH).max(usize::from(*value > 0));
        let bar = "█".repeat(length);
        let bar = if colored {
            Colour::Cyan.paint(bar).to_string()
        } else {
            bar
        };
        output.push_str(&format!("{label:<label_width$} | {bar} {value}\n"));
    }
    output
}

/// Scatter plot with duration on the x axis and calories on the y axis. Each activity type gets
/// its own marker; when two sessions land on the same cell the later one wins.
pub fn duration_vs_calories(records: &[ActivityRecord], colored: bool) -> String {
    if records.is_empty() {
        return format!("{NO_DATA_TO_PLOT}\n");
    }

    let types = records
        .iter()
        .map(|v| v.activity_type.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();
    let max_duration = records.iter().map(|v| v.duration).max().unwrap_or(0) as u64;
    let max_calories = records.iter().map(|v| v.calories_burned).max().unwrap_or(0) as u64;

    let mut grid = vec![vec![None::<usize>; PLOT_WIDTH]; PLOT_HEIGHT];
    for record in records {
        let Ok(type_index) = types.binary_search(&record.activity_type.as_str()) else {
            continue;
        };
        let column = scale(record.duration.into(), max_duration, PLOT_WIDTH - 1);
        let row =
            PLOT_HEIGHT - 1 - scale(record.calories_burned.into(), max_calories, PLOT_HEIGHT - 1);
        grid[row][column] = Some(type_index);
    }

    let paint_marker = |index: usize| {
        let marker = MARKERS[index % MARKERS.len()].to_string();
        if colored {
            PALETTE[index % PALETTE.len()].paint(marker).to_string()
        } else {
            marker
        }
    };

    let axis_width = max_calories.to_string().len();
    let mut output = String::from("Duration vs Calories Burned\n");
    for (index, cells) in grid.iter().enumerate() {
        let label = if index == 0 {
            max_calories.to_string()
        } else if index == PLOT_HEIGHT - 1 {
            "0".to_string()
        } else {
            String::new()
        };
        let line = cells
            .iter()
            .map(|cell| cell.map_or_else(|| " ".to_string(), paint_marker))
            .collect::<String>();
        output.push_str(format!("{label:>axis_width$} |{line}").trim_end());
        output.push('\n');
    }
    output.push_str(&format!("{:>axis_width$} +{}\n", "", "-".repeat(PLOT_WIDTH)));
    output.push_str(&format!(
        "{:>axis_width$}  0{max_duration:>width$}\n",
        "",
        width = PLOT_WIDTH - 1
    ));
    output.push_str("x: duration (minutes), y: calories burned\n");

    let legend = types
        .iter()
        .enumerate()
        .map(|(index, activity_type)| format!("{} {activity_type}", paint_marker(index)))
        .collect::<Vec<_>>()
        .join("  ");
    output.push_str(&format!("Legend: {legend}\n"));
    output
}
