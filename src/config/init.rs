use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use super::schema::Settings;
use super::validation::is_clock_time;
use super::{get_config_path, save_settings};
use crate::questions::{find_question, QUESTION_DEFINITIONS};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn prompt_clock_time(message: &str, default: &str) -> Result<String> {
    loop {
        let input = prompt_with_default(message, default)?;
        if is_clock_time(&input) {
            return Ok(input);
        }
        println!("  Invalid: expected HH:MM (e.g. 21:30). Try again.");
    }
}

/// Split a comma or space separated list of question ids, keeping known ids.
/// Unknown ids are returned separately so the caller can report them.
fn parse_question_ids(input: &str) -> (Vec<&'static str>, Vec<String>) {
    let mut known = Vec::new();
    let mut unknown = Vec::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let id = token.to_uppercase();
        match find_question(&id) {
            Some(question) => known.push(question.id),
            None => unknown.push(token.to_string()),
        }
    }
    (known, unknown)
}

/// Write the default settings without asking anything.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_settings(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Pass --force to overwrite.",
            path.display()
        );
    }
    save_settings(path, &Settings::default())
}

/// Run the interactive setup to create a settings file.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("daily-check setup");
    println!("=================");
    println!();

    let defaults = Settings::default();

    println!("Entries written inside the night window are marked as night entries.");
    let night_start = prompt_clock_time("Night starts at", &defaults.night_start)?;
    let night_end = prompt_clock_time("Night ends at", &defaults.night_end)?;

    println!();
    println!("Some questions may not fit weekends and holidays. Questions:");
    for question in QUESTION_DEFINITIONS {
        println!("  {}  {}", question.id, question.label);
    }
    let mut settings = Settings {
        night_start,
        night_end,
        ..defaults
    };
    loop {
        let input = prompt("Skip on days off (ids, e.g. 'B1 B2', empty for none): ")?;
        let (known, unknown) = parse_question_ids(&input);
        if !unknown.is_empty() {
            println!("  Unknown ids: {}. Try again.", unknown.join(", "));
            continue;
        }
        for id in known {
            settings.questions_skip_holiday.insert(id.to_string(), true);
        }
        break;
    }

    let default_config_path = match default_path {
        Some(path) => path,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    save_settings(&config_path, &settings)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `daily-check check` to record today's entry.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_parse_question_ids() {
        let (known, unknown) = parse_question_ids("b1, B2  zz");
        assert_eq!(known, vec!["B1", "B2"]);
        assert_eq!(unknown, vec!["zz".to_string()]);

        let (known, unknown) = parse_question_ids("");
        assert!(known.is_empty());
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_write_default_settings_respects_force() {
        let path = env::temp_dir().join("daily_check_test_init.yaml");
        let _ = std::fs::remove_file(&path);

        write_default_settings(&path, false).unwrap();
        assert!(write_default_settings(&path, false).is_err());
        write_default_settings(&path, true).unwrap();

        let loaded = super::super::load_settings(Some(path.clone())).unwrap();
        assert_eq!(loaded, Settings::default());

        let _ = std::fs::remove_file(&path);
    }
}
