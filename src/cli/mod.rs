pub mod output;
pub mod shell;

use std::{
    io::{self, BufRead, IsTerminal, Write},
    path::{Path, PathBuf},
};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use output::{
    chart::{render_chart, ChartKind},
    render_activity_trends, render_daily_summary, render_records, NO_DATA,
};
use serde::Serialize;
use shell::run_shell;
use tracing::level_filters::LevelFilter;

use crate::{
    analysis::{
        filter::{by_activity_type, by_date_range, DateRange},
        summary::{activity_trends, daily_summary},
    },
    store::{
        activity_log::{ActivityLog, LoadStatus},
        entities::NewActivity,
        error::AddError,
        record_storage::CsvActivityStorage,
    },
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, DEFAULT_FILE_NAME},
        logging::{enable_logging, CLI_PREFIX},
        time::format_date,
    },
};

#[derive(Parser, Debug)]
#[command(name = "fittrack", version)]
#[command(about = "Personal activity log for exercise sessions", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Option<Commands>,
    #[arg(
        long,
        global = true,
        help = "Activity file. By default saved into $XDG_STATE_HOME/fittrack or $HOME/.local/state/fittrack"
    )]
    file: Option<PathBuf>,
    #[arg(long, global = true, help = "Print logs to the console")]
    log: bool,
    #[arg(long = "log-filter", global = true, help = "Log level, overrides RUST_LOG")]
    log_filter: Option<LevelFilter>,
    #[arg(long, global = true, help = "Print results as JSON")]
    json: bool,
    #[arg(long = "no-color", global = true, help = "Don't color charts")]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Record an exercise session")]
    Add {
        #[arg(long, help = "Date of the session as YYYY-MM-DD. Today by default")]
        date: Option<String>,
        #[arg(long = "type", help = "Activity type, for example \"Run\"")]
        activity_type: String,
        #[arg(long, help = "Duration in minutes")]
        duration: String,
        #[arg(long, help = "Calories burned")]
        calories: String,
    },
    #[command(about = "Total duration and calories per day")]
    Daily,
    #[command(about = "Average duration and calories per activity type")]
    Trends,
    #[command(about = "Sessions between two dates, both inclusive")]
    Range { start: String, end: String },
    #[command(about = "Sessions of an activity type, ignoring case")]
    Type { name: String },
    #[command(about = "Draw a chart in the terminal")]
    Chart { kind: ChartKind },
    #[command(about = "Interactive menu. Used when no command is given")]
    Shell,
}

struct OutputOptions {
    json: bool,
    colored: bool,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = create_application_default_path()?;
    enable_logging(CLI_PREFIX, &app_dir, args.log_filter, args.log)?;

    let path = args
        .file
        .clone()
        .unwrap_or_else(|| app_dir.join(DEFAULT_FILE_NAME));
    let options = OutputOptions {
        json: args.json,
        colored: !args.no_color && io::stdout().is_terminal(),
    };

    run_command(
        args.commands.unwrap_or(Commands::Shell),
        &path,
        &DefaultClock,
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
        options,
    )
    .await
}

fn describe_load_status(status: &LoadStatus, path: &Path) -> Option<String> {
    match status {
        LoadStatus::Fresh => Some(format!(
            "No file found at '{}'. Starting new tracker.",
            path.display()
        )),
        LoadStatus::Failed(e) => Some(format!("Failed to load data: {e}")),
        LoadStatus::Loaded { .. } => None,
    }
}

fn validation_error(message: String) -> anyhow::Error {
    Args::command()
        .error(clap::error::ErrorKind::ValueValidation, message)
        .into()
}

fn write_json(output: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *output, value)?;
    writeln!(output)?;
    Ok(())
}

async fn run_command(
    command: Commands,
    path: &Path,
    clock: &dyn Clock,
    input: &mut impl BufRead,
    output: &mut impl Write,
    options: OutputOptions,
) -> Result<()> {
    let mut log = ActivityLog::open(CsvActivityStorage::new(path.to_path_buf())).await;

    if let Some(message) = describe_load_status(log.load_status(), path) {
        match (&command, log.load_status()) {
            (Commands::Shell, _) => writeln!(output, "{message}")?,
            // A fresh log is expected for the first `add`, not worth reporting.
            (_, LoadStatus::Fresh) => {}
            _ => eprintln!("{message}"),
        }
    }

    match command {
        Commands::Add {
            date,
            activity_type,
            duration,
            calories,
        } => {
            let activity = NewActivity {
                date: date.unwrap_or_else(|| format_date(clock.today())),
                activity_type,
                duration,
                calories_burned: calories,
            };
            match log.add_activity(activity).await {
                Ok(_) => writeln!(output, "Activity added.")?,
                Err(AddError::Invalid(e)) => return Err(validation_error(e.to_string())),
                Err(AddError::Persist(e)) => {
                    writeln!(output, "Activity added, but failed to save data: {e}")?
                }
            }
        }
        Commands::Daily => {
            let summary = daily_summary(log.records());
            if options.json {
                write_json(output, &summary)?;
            } else if summary.is_empty() {
                writeln!(output, "{NO_DATA}")?;
            } else {
                write!(output, "{}", render_daily_summary(&summary))?;
            }
        }
        Commands::Trends => {
            let trends = activity_trends(log.records());
            if options.json {
                write_json(output, &trends)?;
            } else if trends.is_empty() {
                writeln!(output, "{NO_DATA}")?;
            } else {
                write!(output, "{}", render_activity_trends(&trends))?;
            }
        }
        Commands::Range { start, end } => {
            let range = DateRange::parse(&start, &end)
                .map_err(|e| validation_error(format!("Invalid date format: {e}")))?;
            let filtered = by_date_range(log.records(), range);
            if options.json {
                write_json(output, &filtered)?;
            } else if filtered.is_empty() {
                writeln!(output, "No activities found in that range.")?;
            } else {
                write!(output, "{}", render_records(filtered))?;
            }
        }
        Commands::Type { name } => {
            let filtered = by_activity_type(log.records(), &name);
            if options.json {
                write_json(output, &filtered)?;
            } else if filtered.is_empty() {
                writeln!(output, "No entries for activity type '{name}'.")?;
            } else {
                write!(output, "{}", render_records(filtered))?;
            }
        }
        Commands::Chart { kind } => {
            write!(output, "{}", render_chart(kind, log.records(), options.colored))?;
        }
        Commands::Shell => run_shell(&mut log, input, output, options.colored).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{io::Cursor, path::Path};

    use anyhow::Result;
    use chrono::NaiveDate;
    use clap::Parser;
    use tempfile::tempdir;

    use crate::{
        store::{
            activity_log::ActivityLog, entities::ActivityRecord,
            record_storage::CsvActivityStorage,
        },
        utils::{clock::MockClock, logging::TEST_LOGGING},
    };

    use super::{run_command, Args, Commands, OutputOptions};

    async fn run(path: &Path, clock: &MockClock, command_line: &[&str]) -> Result<String> {
        let args = Args::try_parse_from(command_line)?;
        let mut output = Vec::new();
        run_command(
            args.commands.unwrap_or(Commands::Shell),
            path,
            clock,
            &mut Cursor::new(""),
            &mut output,
            OutputOptions {
                json: args.json,
                colored: false,
            },
        )
        .await?;
        Ok(String::from_utf8(output)?)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[tokio::test]
    async fn test_add_defaults_to_today() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let path = dir.path().join("activities.csv");
        let mut clock = MockClock::new();
        clock.expect_today().times(1).returning(|| date(7));

        let output = run(
            &path,
            &clock,
            &["fittrack", "add", "--type", " Run ", "--duration", "30", "--calories", "300"],
        )
        .await?;
        assert_eq!(output, "Activity added.\n");

        let output = run(
            &path,
            &clock,
            &[
                "fittrack", "add", "--date", "2024-01-03", "--type", "Swim", "--duration", "20",
                "--calories", "0",
            ],
        )
        .await?;
        assert_eq!(output, "Activity added.\n");

        let log = ActivityLog::open(CsvActivityStorage::new(path)).await;
        assert_eq!(
            log.records(),
            &[
                ActivityRecord::new(date(7), "Run", 30, 300),
                ActivityRecord::new(date(3), "Swim", 20, 0),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_input() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("activities.csv");
        let clock = MockClock::new();

        let result = run(
            &path,
            &clock,
            &[
                "fittrack", "add", "--date", "2024-01-01", "--type", "Run", "--duration", "0",
                "--calories", "10",
            ],
        )
        .await;

        assert!(result.is_err());
        assert!(!path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_reports_failed_save() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("missing").join("activities.csv");
        let clock = MockClock::new();

        let output = run(
            &path,
            &clock,
            &[
                "fittrack", "add", "--date", "2024-01-01", "--type", "Run", "--duration", "30",
                "--calories", "300",
            ],
        )
        .await?;

        assert!(
            output.starts_with("Activity added, but failed to save data: "),
            "unexpected output {output:?}"
        );
        assert!(!output.contains("Activity added.\n"));
        assert!(!path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_queries() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("activities.csv");
        std::fs::write(
            &path,
            "date,activity_type,duration,calories_burned\n\
             2024-01-01,Run,30,300\n\
             2024-01-01,Swim,20,150\n\
             2024-01-02,Run,40,400\n",
        )?;
        let clock = MockClock::new();

        let daily = run(&path, &clock, &["fittrack", "daily"]).await?;
        assert_eq!(daily.lines().count(), 3);

        let trends = run(&path, &clock, &["fittrack", "--json", "trends"]).await?;
        let trends: serde_json::Value = serde_json::from_str(&trends)?;
        assert_eq!(trends[0]["activity_type"], "Run");
        assert_eq!(trends[0]["avg_duration"], 35.0);
        assert_eq!(trends[1]["avg_calories"], 150.0);

        let range = run(&path, &clock, &["fittrack", "range", "2024-01-02", "2024-01-05"]).await?;
        assert_eq!(range.lines().count(), 2);
        assert!(range.contains("2024-01-02  Run"));

        let empty = run(&path, &clock, &["fittrack", "range", "2023-01-01", "2023-12-31"]).await?;
        assert_eq!(empty, "No activities found in that range.\n");

        assert!(run(&path, &clock, &["fittrack", "range", "2024-01-01", "tomorrow"])
            .await
            .is_err());

        let by_type = run(&path, &clock, &["fittrack", "--json", "type", "RUN"]).await?;
        let by_type: Vec<ActivityRecord> = serde_json::from_str(&by_type)?;
        assert_eq!(
            by_type,
            vec![
                ActivityRecord::new(date(1), "Run", 30, 300),
                ActivityRecord::new(date(2), "Run", 40, 400),
            ]
        );

        let missing = run(&path, &clock, &["fittrack", "type", "Bike"]).await?;
        assert_eq!(missing, "No entries for activity type 'Bike'.\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_log_messages() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("activities.csv");
        let clock = MockClock::new();

        assert_eq!(run(&path, &clock, &["fittrack", "daily"]).await?, "No data available.\n");
        assert_eq!(run(&path, &clock, &["fittrack", "trends"]).await?, "No data available.\n");
        assert_eq!(
            run(&path, &clock, &["fittrack", "chart", "scatter"]).await?,
            "No data to plot.\n"
        );

        let shell = run(&path, &clock, &["fittrack"]).await?;
        assert!(shell.starts_with("No file found at"));
        Ok(())
    }
}
