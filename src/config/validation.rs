use super::schema::Settings;
use crate::questions::find_question;

/// Validate settings at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("night_start", &settings.night_start),
        ("night_end", &settings.night_end),
    ] {
        if !is_clock_time(value) {
            errors.push(format!("{}: expected HH:MM, got '{}'", field, value));
        }
    }

    for (i, item) in settings.recovery_menu.iter().enumerate() {
        if item.trim().is_empty() {
            errors.push(format!("recovery_menu[{}]: must not be blank", i));
        }
    }

    for (field, map) in [
        ("questions_enabled", &settings.questions_enabled),
        ("questions_skip_holiday", &settings.questions_skip_holiday),
    ] {
        for id in map.keys() {
            if find_question(id).is_none() {
                errors.push(format!("{}.{}: unknown question id", field, id));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Strict `HH:MM` check, 00:00 through 23:59.
pub fn is_clock_time(value: &str) -> bool {
    let Some((hour, minute)) = value.split_once(':') else {
        return false;
    };
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hour) || !two_digits(minute) {
        return false;
    }
    matches!(
        (hour.parse::<u32>(), minute.parse::<u32>()),
        (Ok(h), Ok(m)) if h < 24 && m < 60
    )
}
