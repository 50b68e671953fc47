use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::holidays::{
    build_holiday_set, Holiday, HolidaySet, FIRST_SUPPORTED_YEAR, LAST_SUPPORTED_YEAR,
};

/// What the calendar knows about a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayInfo {
    pub date: NaiveDate,
    pub holiday: Option<Holiday>,
    pub weekend: bool,
}

impl DayInfo {
    pub fn is_day_off(&self) -> bool {
        self.weekend || self.holiday.is_some()
    }
}

/// Japanese holiday calendar with a per-year memo.
///
/// Holiday sets are built outside the lock and published whole, so readers
/// never see a partially built year. Two threads asking for the same new year
/// may both compute it; the first insert wins and the results are identical.
/// Entries are never evicted.
#[derive(Debug, Default)]
pub struct HolidayCalendar {
    years: RwLock<HashMap<i32, Arc<HolidaySet>>>,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the equinox approximations hold for `year`.
    pub fn is_supported_year(year: i32) -> bool {
        (FIRST_SUPPORTED_YEAR..=LAST_SUPPORTED_YEAR).contains(&year)
    }

    /// All holidays of `year`, computed on first use.
    pub fn holidays_for_year(&self, year: i32) -> Arc<HolidaySet> {
        if let Some(set) = self.cached(year) {
            return set;
        }

        let (set, inserted) = self.publish(year, Arc::new(build_holiday_set(year)));
        if inserted && !Self::is_supported_year(year) {
            crate::diag_warn!(
                "holiday dates for {} are approximate; equinox formulas cover {}-{}",
                year,
                FIRST_SUPPORTED_YEAR,
                LAST_SUPPORTED_YEAR
            );
        }
        set
    }

    /// Store `computed` unless another caller got there first. Returns the
    /// stored set and whether this call inserted it.
    fn publish(&self, year: i32, computed: Arc<HolidaySet>) -> (Arc<HolidaySet>, bool) {
        let mut years = self.years.write().unwrap_or_else(|e| e.into_inner());
        match years.entry(year) {
            Entry::Occupied(existing) => (existing.get().clone(), false),
            Entry::Vacant(slot) => (slot.insert(computed).clone(), true),
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays_for_year(date.year()).contains(date)
    }

    /// Saturday, Sunday, or a holiday.
    pub fn is_weekend_or_holiday(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || self.is_holiday(date)
    }

    pub fn day_info(&self, date: NaiveDate) -> DayInfo {
        DayInfo {
            date,
            holiday: self.holidays_for_year(date.year()).get(date),
            weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }

    /// Number of years computed so far.
    pub fn cached_years(&self) -> usize {
        self.years.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn cached(&self, year: i32) -> Option<Arc<HolidaySet>> {
        self.years
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&year)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_date_holidays() {
        let calendar = HolidayCalendar::new();
        assert!(calendar.is_holiday(date(2026, 1, 1)));
        assert!(calendar.is_holiday(date(2026, 2, 23)));
    }

    #[test]
    fn test_substitute_holiday() {
        let calendar = HolidayCalendar::new();
        assert!(calendar.is_holiday(date(2026, 5, 6)));
    }

    #[test]
    fn test_citizens_holiday() {
        let calendar = HolidayCalendar::new();
        assert!(calendar.is_holiday(date(2026, 9, 22)));
    }

    #[test]
    fn test_weekend_or_holiday() {
        let calendar = HolidayCalendar::new();
        // Saturday
        assert!(calendar.is_weekend_or_holiday(date(2026, 2, 21)));
        // Ordinary Tuesday
        assert!(!calendar.is_weekend_or_holiday(date(2026, 2, 24)));
        // Holiday on a weekday
        assert!(calendar.is_weekend_or_holiday(date(2026, 11, 3)));
    }

    #[test]
    fn test_day_info() {
        let calendar = HolidayCalendar::new();

        let info = calendar.day_info(date(2026, 5, 6));
        assert_eq!(info.holiday, Some(Holiday::Substitute));
        assert!(!info.weekend);
        assert!(info.is_day_off());

        let info = calendar.day_info(date(2026, 2, 24));
        assert_eq!(info.holiday, None);
        assert!(!info.is_day_off());

        let info = calendar.day_info(date(2026, 2, 22));
        assert!(info.weekend);
        assert!(info.is_day_off());
    }

    #[test]
    fn test_new_years_day_every_year() {
        let calendar = HolidayCalendar::new();
        for year in 1900..=2099 {
            assert!(calendar.is_holiday(date(year, 1, 1)), "{}", year);
        }
    }

    #[test]
    fn test_no_emperors_birthday_before_2020() {
        let calendar = HolidayCalendar::new();
        for year in 1990..2020 {
            assert!(!calendar.is_holiday(date(year, 2, 23)), "{}", year);
        }
    }

    #[test]
    fn test_memoized_per_year() {
        let calendar = HolidayCalendar::new();
        let first = calendar.holidays_for_year(2026);
        let second = calendar.holidays_for_year(2026);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calendar.cached_years(), 1);

        calendar.is_holiday(date(2027, 3, 1));
        assert_eq!(calendar.cached_years(), 2);
    }

    #[test]
    fn test_deterministic_across_calendars() {
        let a = HolidayCalendar::new();
        let b = HolidayCalendar::new();
        for year in [1955, 1980, 2020, 2021, 2026, 2099] {
            assert_eq!(*a.holidays_for_year(year), *b.holidays_for_year(year));
        }
    }

    #[test]
    fn test_concurrent_first_requests_agree() {
        let calendar = Arc::new(HolidayCalendar::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let calendar = Arc::clone(&calendar);
                thread::spawn(move || calendar.holidays_for_year(2026))
            })
            .collect();

        let sets: Vec<Arc<HolidaySet>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for set in &sets {
            assert_eq!(set.len(), 18);
            assert_eq!(**set, *sets[0]);
        }
        assert_eq!(calendar.cached_years(), 1);
    }

    #[test]
    fn test_second_publish_keeps_first_set() {
        let calendar = HolidayCalendar::new();
        let (first, inserted) = calendar.publish(2150, Arc::new(build_holiday_set(2150)));
        assert!(inserted);

        let (second, inserted) = calendar.publish(2150, Arc::new(build_holiday_set(2150)));
        assert!(!inserted);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &calendar.holidays_for_year(2150)));
        assert_eq!(calendar.cached_years(), 1);
    }

    #[test]
    fn test_supported_year_range() {
        assert!(HolidayCalendar::is_supported_year(1900));
        assert!(HolidayCalendar::is_supported_year(2099));
        assert!(!HolidayCalendar::is_supported_year(1899));
        assert!(!HolidayCalendar::is_supported_year(2100));
    }

    #[test]
    fn test_unsupported_year_still_computes() {
        let calendar = HolidayCalendar::new();
        assert!(calendar.is_holiday(date(2150, 1, 1)));
    }
}
