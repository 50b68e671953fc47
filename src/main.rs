use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Instant;

use daily_check::calendar::{days_ago, parse_date_key, HolidayCalendar};
use daily_check::config::{self, Settings};
use daily_check::entries::{self, DailyEntry, EntryNotes, RecoveryItem, RecoveryLog};
use daily_check::questions::{active_questions, QUESTION_DEFINITIONS};
use daily_check::scoring::{evaluate, parse_answer_arg, RawAnswerMap};
use daily_check::{diag_verbose, diag_warn, diagnostics, output};

const EXIT_SUCCESS: i32 = 0;
const EXIT_STORAGE: i32 = 2;
const EXIT_INPUT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the config file (interactive on a terminal)
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
        /// Write the defaults without asking anything
        #[arg(long)]
        defaults: bool,
    },
    /// Score today's answers (default if no subcommand)
    Check {
        /// Date to check (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Answer as ID=VALUE, repeatable (e.g. A1=true, E2=4, D3=held).
        /// Answers to questions not asked today still count toward flags.
        #[arg(short, long = "answer", value_name = "ID=VALUE")]
        answers: Vec<String>,
        /// JSON or YAML file mapping question ids to answers
        #[arg(long = "answers", value_name = "FILE")]
        answers_file: Option<PathBuf>,
        /// What happened
        #[arg(long)]
        facts: Option<String>,
        /// How it felt
        #[arg(long)]
        feelings: Option<String>,
        /// What to do next
        #[arg(long)]
        actions: Option<String>,
        /// Store the result as the entry for the date
        #[arg(long)]
        save: bool,
        /// Print the evaluation as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the questions asked on a date
    Questions {
        #[arg(long)]
        date: Option<String>,
    },
    /// List the holidays of a year
    Holidays {
        /// Year (defaults to the current year)
        year: Option<i32>,
    },
    /// Show whether a date is a holiday or day off
    Day {
        /// Date (YYYY-MM-DD, defaults to today)
        date: Option<String>,
    },
    /// Show recent entries, newest first
    History {
        #[arg(short, long, default_value_t = 14)]
        limit: usize,
    },
    /// Show the stored entry for a date
    Show {
        date: String,
    },
    /// Log or list recovery activities
    Recovery {
        #[command(subcommand)]
        command: RecoveryCommands,
    },
}

#[derive(Subcommand, Debug)]
enum RecoveryCommands {
    /// Record the recovery items for a date, replacing any earlier log
    Log {
        #[arg(long)]
        date: Option<String>,
        /// Item as NAME[:STATUS[:NOTE]], status one of none, planned, done
        #[arg(short, long = "item", value_name = "ITEM", required = true)]
        items: Vec<String>,
    },
    /// List recovery logs on or after a date
    List {
        /// Duration back from today (e.g. 7d, 2weeks) or a YYYY-MM-DD date
        #[arg(long, default_value = "7d")]
        since: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "daily-check")]
#[command(about = "Daily self-check with a Japanese holiday calendar", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/daily-check/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Print the error with its context chain and exit with `code`.
fn fail(code: i32, what: &str, err: anyhow::Error) -> ! {
    diagnostics::flush();
    eprintln!("{}: {:#}", what, err);
    std::process::exit(code);
}

fn parse_date_arg(value: Option<&str>, today: NaiveDate) -> NaiveDate {
    match value {
        None => today,
        Some(raw) => parse_date_key(raw).unwrap_or_else(|| {
            fail(
                EXIT_INPUT,
                "Invalid date",
                anyhow::anyhow!("expected YYYY-MM-DD, got '{}'", raw),
            )
        }),
    }
}

/// `--since` accepts a duration back from today or an explicit date.
fn parse_since(value: &str, today: NaiveDate) -> Result<NaiveDate> {
    if let Some(date) = parse_date_key(value) {
        return Ok(date);
    }
    let duration = humantime::parse_duration(value).with_context(|| {
        format!("expected a duration like 7d or a YYYY-MM-DD date, got '{}'", value)
    })?;
    let days = i64::try_from(duration.as_secs() / 86_400).unwrap_or(i64::MAX);
    Ok(days_ago(today, days))
}

fn read_answers_file(path: &Path) -> Result<RawAnswerMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file at {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let answers = if is_json {
        serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse answers: invalid JSON in {}", path.display())
        })?
    } else {
        serde_saphyr::from_str(&content).with_context(|| {
            format!("Failed to parse answers: invalid YAML in {}", path.display())
        })?
    };
    Ok(answers)
}

/// Load, validate and normalize settings, exiting on any config problem.
fn load_checked_settings(config_path: Option<PathBuf>) -> Settings {
    let settings = config::load_settings(config_path)
        .unwrap_or_else(|e| fail(EXIT_CONFIG, "Config error", e));

    if let Err(errors) = config::validate_settings(&settings) {
        diagnostics::flush();
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    settings.normalized()
}

fn data_dir_for(settings: &Settings) -> PathBuf {
    let data_dir = config::get_data_dir(settings)
        .unwrap_or_else(|e| fail(EXIT_CONFIG, "Config error", e));
    diag_verbose!("Data directory: {}", data_dir.display());
    data_dir
}

fn main() {
    let cli = Cli::parse();
    diagnostics::set_verbose(cli.verbose);
    diagnostics::activate();

    let command = cli.command.unwrap_or(Commands::Check {
        date: None,
        answers: Vec::new(),
        answers_file: None,
        facts: None,
        feelings: None,
        actions: None,
        save: false,
        json: false,
    });
    let config_path = cli.config.map(PathBuf::from);
    let start_time = Instant::now();
    let now = Local::now().naive_local();
    let today = now.date();
    let use_colors = output::should_use_colors();
    let calendar = HolidayCalendar::new();

    match command {
        Commands::Init { force, defaults } => {
            let interactive = !defaults && std::io::stdin().is_terminal();
            let result = if interactive {
                config::init::run_init_wizard(config_path)
            } else {
                let path = match config_path {
                    Some(path) => Ok(path),
                    None => config::get_config_path(),
                };
                path.and_then(|path| {
                    config::init::write_default_settings(&path, force)?;
                    println!("Config saved to {}", path.display());
                    Ok(())
                })
            };
            if let Err(e) = result {
                fail(EXIT_CONFIG, "Init failed", e);
            }
        }
        Commands::Check {
            date,
            answers,
            answers_file,
            facts,
            feelings,
            actions,
            save,
            json,
        } => {
            let settings = load_checked_settings(config_path);
            let date = parse_date_arg(date.as_deref(), today);
            let info = calendar.day_info(date);
            let questions = active_questions(&settings, info.is_day_off());
            diag_verbose!(
                "{} is {}; asking {} of {} questions",
                date,
                if info.is_day_off() { "a day off" } else { "a workday" },
                questions.len(),
                QUESTION_DEFINITIONS.len()
            );

            let mut raw = match &answers_file {
                Some(path) => read_answers_file(path)
                    .unwrap_or_else(|e| fail(EXIT_INPUT, "Invalid answers", e)),
                None => RawAnswerMap::new(),
            };
            for arg in &answers {
                let (id, answer) =
                    parse_answer_arg(arg).unwrap_or_else(|e| fail(EXIT_INPUT, "Invalid answer", e));
                raw.insert(id, answer);
            }
            for id in raw.keys() {
                if !questions.iter().any(|q| q.id == id.as_str()) {
                    diag_warn!(
                        "{} is not asked today: its answer is stored and can raise flags, \
                         but it does not count toward the score",
                        id
                    );
                }
            }

            // Only a check for today can happen at night
            let is_night = date == today && settings.night_window().contains(now.time());
            let evaluation = evaluate(&questions, &raw);

            if json {
                let report = serde_json::json!({
                    "date": daily_check::calendar::date_key(date),
                    "dayOff": info.is_day_off(),
                    "isNight": is_night,
                    "questions": questions.iter().map(|q| q.id).collect::<Vec<_>>(),
                    "evaluation": &evaluation,
                });
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{}", text),
                    Err(e) => fail(EXIT_INPUT, "Failed to serialize evaluation", e.into()),
                }
            } else {
                println!(
                    "{}",
                    output::format_evaluation(&info, is_night, &evaluation, use_colors)
                );
            }

            if save {
                let path = entries::entries_path(&data_dir_for(&settings));
                let mut log = entries::load_entries(&path)
                    .unwrap_or_else(|e| fail(EXIT_STORAGE, "Storage error", e));
                let notes = EntryNotes {
                    facts,
                    feelings,
                    actions,
                };
                log.upsert(DailyEntry::new(date, is_night, raw, evaluation, notes));
                if let Err(e) = entries::save_entries(&path, &log) {
                    fail(EXIT_STORAGE, "Storage error", e);
                }
                if !json {
                    println!();
                    println!("Saved entry for {}", date);
                }
            }
        }
        Commands::Questions { date } => {
            let settings = load_checked_settings(config_path);
            let date = parse_date_arg(date.as_deref(), today);
            let questions = active_questions(&settings, calendar.is_weekend_or_holiday(date));
            println!("{}", output::format_question_list(&questions, use_colors));
        }
        Commands::Holidays { year } => {
            let year = year.unwrap_or_else(|| today.year());
            let set = calendar.holidays_for_year(year);
            println!("{}", output::format_holiday_list(&set, use_colors));
        }
        Commands::Day { date } => {
            let settings = load_checked_settings(config_path);
            let date = parse_date_arg(date.as_deref(), today);
            let is_night = (date == today).then(|| settings.night_window().contains(now.time()));
            println!(
                "{}",
                output::format_day_status(&calendar.day_info(date), is_night, use_colors)
            );
        }
        Commands::History { limit } => {
            let data_dir = data_dir_for(&load_checked_settings(config_path));
            let log = entries::load_entries(&entries::entries_path(&data_dir))
                .unwrap_or_else(|e| fail(EXIT_STORAGE, "Storage error", e));
            let recent = log.list_recent(limit);
            println!(
                "{}",
                output::format_history(&recent, QUESTION_DEFINITIONS, use_colors)
            );
        }
        Commands::Show { date } => {
            let date = parse_date_arg(Some(date.as_str()), today);
            let data_dir = data_dir_for(&load_checked_settings(config_path));
            let log = entries::load_entries(&entries::entries_path(&data_dir))
                .unwrap_or_else(|e| fail(EXIT_STORAGE, "Storage error", e));
            match log.get_by_date(date) {
                Some(entry) => println!(
                    "{}",
                    output::format_entry_detail(entry, QUESTION_DEFINITIONS, use_colors)
                ),
                None => fail(
                    EXIT_INPUT,
                    "Not found",
                    anyhow::anyhow!("no entry for {}", date),
                ),
            }
        }
        Commands::Recovery { command } => match command {
            RecoveryCommands::Log { date, items } => {
                let settings = load_checked_settings(config_path);
                let date = parse_date_arg(date.as_deref(), today);
                let items: Vec<RecoveryItem> = items
                    .iter()
                    .map(|arg| RecoveryItem::parse(arg))
                    .collect::<Result<_>>()
                    .unwrap_or_else(|e| fail(EXIT_INPUT, "Invalid recovery item", e));
                for item in &items {
                    if !settings.recovery_menu.contains(&item.name) {
                        diag_warn!("'{}' is not in the recovery menu", item.name);
                    }
                }

                let path = entries::recovery_path(&data_dir_for(&settings));
                let mut book = entries::load_recovery(&path)
                    .unwrap_or_else(|e| fail(EXIT_STORAGE, "Storage error", e));
                let count = items.len();
                book.upsert(RecoveryLog::new(date, items));
                if let Err(e) = entries::save_recovery(&path, &book) {
                    fail(EXIT_STORAGE, "Storage error", e);
                }
                println!("Logged {} recovery item(s) for {}", count, date);
            }
            RecoveryCommands::List { since } => {
                let since = parse_since(&since, today)
                    .unwrap_or_else(|e| fail(EXIT_INPUT, "Invalid --since", e));
                let data_dir = data_dir_for(&load_checked_settings(config_path));
                let book = entries::load_recovery(&entries::recovery_path(&data_dir))
                    .unwrap_or_else(|e| fail(EXIT_STORAGE, "Storage error", e));
                let logs = book.list_since(since);
                println!("{}", output::format_recovery_logs(&logs, use_colors));
            }
        },
    }

    diag_verbose!("Done in {:?}", start_time.elapsed());
    diagnostics::flush();
    std::process::exit(EXIT_SUCCESS);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_since_duration() {
        let today = date(2026, 3, 10);
        assert_eq!(parse_since("7d", today).unwrap(), date(2026, 3, 3));
        assert_eq!(parse_since("2weeks", today).unwrap(), date(2026, 2, 24));
        assert_eq!(parse_since("12h", today).unwrap(), today);
    }

    #[test]
    fn test_parse_since_date() {
        let today = date(2026, 3, 10);
        assert_eq!(parse_since("2026-01-05", today).unwrap(), date(2026, 1, 5));
        assert!(parse_since("last tuesday", today).is_err());
    }

    #[test]
    fn test_read_answers_file_json_and_yaml() {
        let dir = std::env::temp_dir();
        let json_path = dir.join("daily_check_test_answers.json");
        std::fs::write(&json_path, r#"{"A1": true, "E2": 4}"#).unwrap();
        let answers = read_answers_file(&json_path).unwrap();
        assert_eq!(answers.len(), 2);

        let yaml_path = dir.join("daily_check_test_answers.yaml");
        std::fs::write(&yaml_path, "D3: held\nC2: short\n").unwrap();
        let answers = read_answers_file(&yaml_path).unwrap();
        assert_eq!(answers.len(), 2);

        let _ = std::fs::remove_file(&json_path);
        let _ = std::fs::remove_file(&yaml_path);
    }

    #[test]
    fn test_cli_parses_repeated_answers() {
        let cli = Cli::parse_from([
            "daily-check",
            "check",
            "-a",
            "A1=true",
            "--answer",
            "E2=4",
            "--save",
        ]);
        match cli.command {
            Some(Commands::Check { answers, save, .. }) => {
                assert_eq!(answers, vec!["A1=true", "E2=4"]);
                assert!(save);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_recovery_log_requires_item() {
        assert!(Cli::try_parse_from(["daily-check", "recovery", "log"]).is_err());
        let parsed = Cli::try_parse_from(["daily-check", "recovery", "log", "-i", "サウナ:done"]);
        assert!(parsed.is_ok());
    }
}
