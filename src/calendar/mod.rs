pub mod cache;
pub mod holidays;
pub mod night;

pub use cache::{DayInfo, HolidayCalendar};
pub use holidays::{build_holiday_set, Holiday, HolidaySet, NationalHoliday};
pub use night::{is_night_time, NightWindow};

use chrono::{Duration, NaiveDate};

/// Canonical storage key for a date: `YYYY-MM-DD`, zero padded.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` key back into a date. Returns None for anything else.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d").ok()
}

/// The date `days` days before `today`.
pub fn days_ago(today: NaiveDate, days: i64) -> NaiveDate {
    today
        .checked_sub_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MIN)
}
