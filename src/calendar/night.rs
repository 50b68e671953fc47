use chrono::{NaiveTime, Timelike};
use serde::Serialize;

/// A daily "night" interval given as `HH:MM` boundaries.
///
/// Equal boundaries mean there is no night. When `start < end` the window is
/// `[start, end)` within one day, otherwise it wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NightWindow {
    start_minutes: u32,
    end_minutes: u32,
}

impl NightWindow {
    /// Parse boundaries leniently: a missing or garbled hour or minute reads as 0.
    pub fn parse(start: &str, end: &str) -> Self {
        Self {
            start_minutes: minutes_of_day(start),
            end_minutes: minutes_of_day(end),
        }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        let current = time.hour() * 60 + time.minute();
        let (start, end) = (self.start_minutes, self.end_minutes);

        if start == end {
            false
        } else if start < end {
            current >= start && current < end
        } else {
            current >= start || current < end
        }
    }
}

/// Whether `time` falls inside the night window `start`..`end`.
pub fn is_night_time(time: NaiveTime, start: &str, end: &str) -> bool {
    NightWindow::parse(start, end).contains(time)
}

fn minutes_of_day(value: &str) -> u32 {
    let mut parts = value.split(':');
    let hour = leading_number(parts.next().unwrap_or(""));
    let minute = leading_number(parts.next().unwrap_or(""));
    hour.saturating_mul(60).saturating_add(minute)
}

/// Digits at the start of `text` after leading whitespace, or 0.
fn leading_number(text: &str) -> u32 {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
