use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::calendar::{date_key, DayInfo, HolidaySet};
use crate::entries::{DailyEntry, RecoveryLog, RecoveryStatus};
use crate::questions::{QuestionDefinition, Section};
use crate::scoring::{Evaluation, FlagSet, RawAnswer, RawAnswerMap};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a [0, 1] score as a whole percentage ("72%")
pub fn format_score(score: f64) -> String {
    let clamped = if score.is_finite() { score.clamp(0.0, 1.0) } else { 0.0 };
    format!("{:.0}%", clamped * 100.0)
}

/// Ten-cell bar for a [0, 1] score
fn score_bar(score: f64) -> String {
    let filled = if score.is_finite() {
        (score.clamp(0.0, 1.0) * 10.0).round() as usize
    } else {
        0
    };
    format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled))
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, counting chars rather than bytes
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// One-word description of a day
fn day_kind(info: &DayInfo) -> String {
    match (info.holiday, info.weekend) {
        (Some(holiday), _) => holiday.label().to_string(),
        (None, true) => "Weekend".to_string(),
        (None, false) => "Workday".to_string(),
    }
}

fn flag_names(flags: &FlagSet) -> String {
    let names: Vec<&str> = flags.raised().map(|f| f.key()).collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

/// Format the result of a check: per-section averages, overall score,
/// raised flags and suggestions
pub fn format_evaluation(
    info: &DayInfo,
    is_night: bool,
    evaluation: &Evaluation,
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();

    let header = format!(
        "{}  {}{}",
        date_key(info.date),
        day_kind(info),
        if is_night { "  (night)" } else { "" }
    );
    lines.push(if use_colors { header.bold().to_string() } else { header });
    lines.push(String::new());

    for (section, average) in &evaluation.section_averages {
        let line = format!(
            "  {} {:<10} {} {:>4}",
            section.code(),
            section.label(),
            score_bar(*average),
            format_score(*average)
        );
        lines.push(if use_colors && *average < 0.5 {
            line.yellow().to_string()
        } else {
            line
        });
    }

    let overall = format!("Overall: {}", format_score(evaluation.overall));
    lines.push(String::new());
    lines.push(if use_colors { overall.bold().to_string() } else { overall });

    if evaluation.flags.any() {
        let flags = format!("Flags: {}", flag_names(&evaluation.flags));
        lines.push(if use_colors { flags.red().to_string() } else { flags });
    }

    lines.push(String::new());
    for suggestion in &evaluation.suggestions {
        if use_colors {
            lines.push(format!("  {} {}", "*".cyan(), suggestion));
        } else {
            lines.push(format!("  * {}", suggestion));
        }
    }

    lines.join("\n")
}

/// Format the questions to be asked, grouped under section headers
pub fn format_question_list(questions: &[QuestionDefinition], use_colors: bool) -> String {
    if questions.is_empty() {
        return "No questions enabled.".to_string();
    }

    let mut lines = Vec::new();
    let mut current: Option<Section> = None;
    for question in questions {
        if current != Some(question.section) {
            current = Some(question.section);
            let header = format!("{} {}", question.section.code(), question.section.label());
            lines.push(if use_colors { header.bold().to_string() } else { header });
        }
        let hint = format!("[{}]", question.answer_hint());
        if use_colors {
            lines.push(format!("  {:<3} {} {}", question.id.cyan(), question.label, hint.dimmed()));
        } else {
            lines.push(format!("  {:<3} {} {}", question.id, question.label, hint));
        }
    }
    lines.join("\n")
}

/// Format a year's holidays as "date  weekday  name", one per line
pub fn format_holiday_list(set: &HolidaySet, use_colors: bool) -> String {
    if set.is_empty() {
        return format!("No holidays in {}.", set.year());
    }

    set.iter()
        .map(|(date, holiday)| {
            let key = date_key(date);
            let weekday = date.format("%a").to_string();
            if use_colors {
                format!("{}  {}  {}", key.bold(), weekday.dimmed(), holiday.label())
            } else {
                format!("{}  {}  {}", key, weekday, holiday.label())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format what kind of day a date is
pub fn format_day_status(info: &DayInfo, is_night: Option<bool>, use_colors: bool) -> String {
    let mut lines = vec![format!("{} ({})", date_key(info.date), info.date.format("%A"))];

    let kind = day_kind(info);
    lines.push(format!("  Kind:    {}", kind));

    let day_off = if info.is_day_off() { "yes" } else { "no" };
    if use_colors && info.is_day_off() {
        lines.push(format!("  Day off: {}", day_off.green()));
    } else {
        lines.push(format!("  Day off: {}", day_off));
    }

    if let Some(night) = is_night {
        lines.push(format!("  Night:   {}", if night { "yes" } else { "no" }));
    }

    lines.join("\n")
}

/// Format stored entries as a table: date, score, flag count, first suggestion
pub fn format_history(
    entries: &[&DailyEntry],
    questions: &[QuestionDefinition],
    use_colors: bool,
) -> String {
    if entries.is_empty() {
        return "No entries found.".to_string();
    }

    let term_width = get_terminal_width();
    // date(10) + 2 + score(4) + 2 + flags(3) + 2
    let fixed_width = 23;

    entries
        .iter()
        .map(|entry| {
            let overall = entry_overall(entry, questions);
            let score = format!("{:>4}", format_score(overall));
            let flag_count = format!("{:>3}", entry.flags.raised().count());
            let first = entry.suggestions.first().map(String::as_str).unwrap_or("");

            let suggestion = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_text(first, width - fixed_width)
                }
                Some(_) => truncate_text(first, 20),
                None => first.to_string(),
            };

            if use_colors {
                format!(
                    "{}  {}  {}  {}",
                    entry.date.dimmed(),
                    score.bold(),
                    flag_count,
                    suggestion
                )
            } else {
                format!("{}  {}  {}  {}", entry.date, score, flag_count, suggestion)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Overall score of a stored entry, recomputed from its normalized answers
fn entry_overall(entry: &DailyEntry, questions: &[QuestionDefinition]) -> f64 {
    let asked: Vec<QuestionDefinition> = questions
        .iter()
        .filter(|q| entry.normalized.contains_key(q.id))
        .copied()
        .collect();
    let averages = crate::scoring::calculate_section_averages(&asked, &entry.normalized);
    crate::scoring::compute_overall_score(&averages)
}

fn format_answers(answers: &RawAnswerMap) -> Vec<String> {
    answers
        .iter()
        .map(|(id, answer)| {
            let value = match answer {
                RawAnswer::Flag(b) => b.to_string(),
                RawAnswer::Number(n) => n.to_string(),
                RawAnswer::Text(t) => t.clone(),
            };
            format!("    {}: {}", id, value)
        })
        .collect()
}

/// Format one stored entry with detailed multi-line output
pub fn format_entry_detail(
    entry: &DailyEntry,
    questions: &[QuestionDefinition],
    use_colors: bool,
) -> String {
    let title = format!(
        "{}{}",
        entry.date,
        if entry.is_night { "  (night)" } else { "" }
    );
    let mut lines = vec![if use_colors { title.bold().to_string() } else { title }];

    lines.push(format!("  Score: {}", format_score(entry_overall(entry, questions))));
    lines.push(format!("  Flags: {}", flag_names(&entry.flags)));

    if !entry.answers.is_empty() {
        lines.push("  Answers:".to_string());
        lines.extend(format_answers(&entry.answers));
    }

    for (label, text) in [
        ("Facts", &entry.facts),
        ("Feelings", &entry.feelings),
        ("Actions", &entry.actions),
    ] {
        if let Some(text) = text {
            lines.push(format!("  {}: {}", label, text));
        }
    }

    lines.push("  Suggestions:".to_string());
    for suggestion in &entry.suggestions {
        lines.push(format!("    * {}", suggestion));
    }

    lines.push(format!(
        "  Updated: {}",
        entry.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    lines.join("\n")
}

/// Format recovery logs, one block per date
pub fn format_recovery_logs(logs: &[&RecoveryLog], use_colors: bool) -> String {
    if logs.is_empty() {
        return "No recovery logs found.".to_string();
    }

    logs.iter()
        .map(|log| {
            let mut lines = vec![if use_colors {
                log.date.bold().to_string()
            } else {
                log.date.clone()
            }];
            if log.items.is_empty() {
                lines.push("  (no items)".to_string());
            }
            for item in &log.items {
                let status = format!("{:<7}", item.status.to_string());
                let status = match (use_colors, item.status) {
                    (true, RecoveryStatus::Done) => status.green().to_string(),
                    (true, RecoveryStatus::Planned) => status.yellow().to_string(),
                    (true, RecoveryStatus::None) => status.dimmed().to_string(),
                    (false, _) => status,
                };
                if item.note.is_empty() {
                    lines.push(format!("  {} {}", status, item.name));
                } else {
                    lines.push(format!("  {} {} ({})", status, item.name, item.note));
                }
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
