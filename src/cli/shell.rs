//! Menu driven interface over an [ActivityLog].

use std::{
    fmt::Display,
    io::{self, BufRead, Write},
};

use anyhow::Result;
use tracing::debug;

use crate::{
    analysis::{
        filter::{by_activity_type, by_date_range, DateRange},
        summary::{activity_trends, daily_summary},
    },
    store::{activity_log::ActivityLog, entities::ActivityRecord, record_storage::ActivityStorage},
    validation::{parse_date, parse_nonnegative_int, parse_positive_int, validate_nonempty},
};

use super::output::{
    chart::{render_chart, ChartKind},
    render_activity_trends, render_daily_summary, render_records, NO_DATA,
};

const MENU: &str = "\n--- Fitness Tracker ---\n\
                    1. Add Activity\n\
                    2. View Daily Summary\n\
                    3. View Activity Trends\n\
                    4. Filter by Date\n\
                    5. Filter by Activity Type\n\
                    6. Visualizations\n\
                    7. Exit";

const CHART_MENU: &str = "\n1. Activity Distribution\n\
                          2. Calories Over Time\n\
                          3. Duration vs Calories";

/// Reads one line without its line ending. Returns [None] once input is exhausted.
fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

fn ask(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(output, "{prompt}")?;
    output.flush()?;
    read_line(input)
}

/// Keeps asking until `parse` accepts the answer, printing `error` after every rejection.
/// Returns [None] if input ends before a valid answer is given.
pub fn prompt_until<T, E: Display>(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
    parse: impl Fn(&str) -> Result<T, E>,
    error: &str,
) -> io::Result<Option<T>> {
    while let Some(answer) = ask(input, output, prompt)? {
        match parse(&answer) {
            Ok(value) => return Ok(Some(value)),
            Err(e) => {
                debug!("Rejected {answer:?}: {e}");
                writeln!(output, "{error}")?;
            }
        }
    }
    Ok(None)
}

fn prompt_activity(
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<Option<ActivityRecord>> {
    let Some(date) = prompt_until(
        input,
        output,
        "Date (YYYY-MM-DD): ",
        parse_date,
        "Invalid date.",
    )?
    else {
        return Ok(None);
    };
    let Some(activity_type) = prompt_until(
        input,
        output,
        "Activity type: ",
        validate_nonempty,
        "Activity can't be empty.",
    )?
    else {
        return Ok(None);
    };
    let Some(duration) = prompt_until(
        input,
        output,
        "Duration (minutes): ",
        parse_positive_int,
        "Must be a positive number.",
    )?
    else {
        return Ok(None);
    };
    let Some(calories) = prompt_until(
        input,
        output,
        "Calories burned: ",
        parse_nonnegative_int,
        "Must be zero or more.",
    )?
    else {
        return Ok(None);
    };
    Ok(Some(ActivityRecord::new(date, activity_type, duration, calories)))
}

/// Runs the menu loop until the user exits or input ends.
pub async fn run_shell<S: ActivityStorage>(
    log: &mut ActivityLog<S>,
    input: &mut impl BufRead,
    output: &mut impl Write,
    colored: bool,
) -> Result<()> {
    loop {
        writeln!(output, "{MENU}")?;
        let Some(choice) = ask(input, output, "Choose an option: ")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let Some(record) = prompt_activity(input, output)? else {
                    break;
                };
                match log.add(record).await {
                    Ok(()) => writeln!(output, "Activity added.")?,
                    Err(e) => writeln!(output, "Activity added, but failed to save data: {e}")?,
                }
            }
            "2" => {
                if log.is_empty() {
                    writeln!(output, "{NO_DATA}")?;
                } else {
                    write!(output, "{}", render_daily_summary(&daily_summary(log.records())))?;
                }
            }
            "3" => {
                if log.is_empty() {
                    writeln!(output, "{NO_DATA}")?;
                } else {
                    write!(output, "{}", render_activity_trends(&activity_trends(log.records())))?;
                }
            }
            "4" => {
                let Some(start) = ask(input, output, "Start date (YYYY-MM-DD): ")? else {
                    break;
                };
                let Some(end) = ask(input, output, "End date (YYYY-MM-DD): ")? else {
                    break;
                };
                match DateRange::parse(&start, &end) {
                    Ok(range) => {
                        let filtered = by_date_range(log.records(), range);
                        if filtered.is_empty() {
                            writeln!(output, "No activities found in that range.")?;
                        } else {
                            write!(output, "{}", render_records(filtered))?;
                        }
                    }
                    Err(_) => writeln!(output, "Invalid date format.")?,
                }
            }
            "5" => {
                let Some(activity) = ask(input, output, "Activity type to filter by: ")? else {
                    break;
                };
                let filtered = by_activity_type(log.records(), &activity);
                if filtered.is_empty() {
                    writeln!(output, "No entries for activity type '{activity}'.")?;
                } else {
                    write!(output, "{}", render_records(filtered))?;
                }
            }
            "6" => {
                writeln!(output, "{CHART_MENU}")?;
                let Some(choice) = ask(input, output, "Choose visualization: ")? else {
                    break;
                };
                let kind = match choice.as_str() {
                    "1" => ChartKind::Distribution,
                    "2" => ChartKind::Calories,
                    "3" => ChartKind::Scatter,
                    _ => {
                        writeln!(output, "Invalid option.")?;
                        continue;
                    }
                };
                write!(output, "{}", render_chart(kind, log.records(), colored))?;
            }
            "7" => {
                writeln!(output, "Goodbye!")?;
                break;
            }
            _ => writeln!(output, "Invalid choice. Try again.")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::{
        cli::shell::{prompt_until, run_shell},
        store::{
            activity_log::ActivityLog, entities::ActivityRecord,
            record_storage::CsvActivityStorage,
        },
        utils::logging::TEST_LOGGING,
        validation::parse_positive_int,
    };

    #[test]
    fn test_prompt_until_retries() -> Result<()> {
        let mut input = Cursor::new("0\nabc\n12\n");
        let mut output = Vec::new();

        let value = prompt_until(
            &mut input,
            &mut output,
            "Duration: ",
            parse_positive_int,
            "Must be a positive number.",
        )?;

        assert_eq!(value, Some(12));
        let output = String::from_utf8(output)?;
        assert_eq!(output.matches("Duration: ").count(), 3);
        assert_eq!(output.matches("Must be a positive number.").count(), 2);
        Ok(())
    }

    #[test]
    fn test_prompt_until_end_of_input() -> Result<()> {
        let mut input = Cursor::new("-1\r\n");
        let mut output = Vec::new();

        let value = prompt_until(&mut input, &mut output, "> ", parse_positive_int, "bad")?;

        assert_eq!(value, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_shell_add_and_summarize() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let storage = CsvActivityStorage::new(dir.path().join("activities.csv"));
        let mut log = ActivityLog::open(&storage).await;

        let mut input = Cursor::new(
            "1\n2024-13-01\n2024-01-01\n   \nRun\n0\n30\n-5\n300\n\
             1\n2024-01-02\nSwim\n20\n150\n\
             2\n5\nrun\n5\nBike\n9\n7\n",
        );
        let mut output = Vec::new();
        run_shell(&mut log, &mut input, &mut output, false).await?;
        let output = String::from_utf8(output)?;

        for expected in [
            "Invalid date.",
            "Activity can't be empty.",
            "Must be a positive number.",
            "Must be zero or more.",
            "Activity added.",
            "2024-01-01              30             300",
            "No entries for activity type 'Bike'.",
            "Invalid choice. Try again.",
            "Goodbye!",
        ] {
            assert!(output.contains(expected), "missing {expected:?} in {output}");
        }
        assert_eq!(output.matches("Activity added.").count(), 2);

        let date = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let expected = vec![
            ActivityRecord::new(date(1), "Run", 30, 300),
            ActivityRecord::new(date(2), "Swim", 20, 150),
        ];
        assert_eq!(log.records(), expected.as_slice());
        assert_eq!(ActivityLog::open(&storage).await.records(), expected.as_slice());
        Ok(())
    }

    #[tokio::test]
    async fn test_shell_filters_and_empty_views() -> Result<()> {
        let dir = tempdir()?;
        let mut log =
            ActivityLog::open(CsvActivityStorage::new(dir.path().join("activities.csv"))).await;

        let mut input = Cursor::new("2\n3\n6\n1\n6\n4\n4\n2024-01-01\n01/02/2024\n");
        let mut output = Vec::new();
        run_shell(&mut log, &mut input, &mut output, false).await?;
        let output = String::from_utf8(output)?;

        assert_eq!(output.matches("No data available.").count(), 2);
        assert!(output.contains("No data to plot."));
        assert!(output.contains("Invalid option."));
        assert!(output.contains("Invalid date format."));
        Ok(())
    }

    #[tokio::test]
    async fn test_shell_keeps_activity_when_save_fails() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("missing").join("activities.csv");
        let mut log = ActivityLog::open(CsvActivityStorage::new(path.clone())).await;

        let mut input = Cursor::new("1\n2024-01-01\nRun\n30\n300\n2\n7\n");
        let mut output = Vec::new();
        run_shell(&mut log, &mut input, &mut output, false).await?;
        let output = String::from_utf8(output)?;

        assert!(output.contains("Activity added, but failed to save data: "));
        assert!(output.contains("2024-01-01              30             300"));
        assert!(output.contains("Goodbye!"));
        assert_eq!(log.len(), 1);
        assert!(!path.exists());
        Ok(())
    }
}
