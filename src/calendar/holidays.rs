use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;

use super::date_key;

/// First year the equinox approximations are considered valid for.
pub const FIRST_SUPPORTED_YEAR: i32 = 1900;
/// Last year the equinox approximations are considered valid for.
pub const LAST_SUPPORTED_YEAR: i32 = 2099;

/// A holiday named by the Act on National Holidays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NationalHoliday {
    NewYearsDay,
    ComingOfAgeDay,
    NationalFoundationDay,
    EmperorsBirthday,
    VernalEquinoxDay,
    ShowaDay,
    ConstitutionMemorialDay,
    GreeneryDay,
    ChildrensDay,
    MarineDay,
    MountainDay,
    RespectForTheAgedDay,
    AutumnalEquinoxDay,
    SportsDay,
    CultureDay,
    LaborThanksgivingDay,
}

impl NationalHoliday {
    pub fn name(&self) -> &'static str {
        match self {
            NationalHoliday::NewYearsDay => "New Year's Day",
            NationalHoliday::ComingOfAgeDay => "Coming of Age Day",
            NationalHoliday::NationalFoundationDay => "National Foundation Day",
            NationalHoliday::EmperorsBirthday => "Emperor's Birthday",
            NationalHoliday::VernalEquinoxDay => "Vernal Equinox Day",
            NationalHoliday::ShowaDay => "Showa Day",
            NationalHoliday::ConstitutionMemorialDay => "Constitution Memorial Day",
            NationalHoliday::GreeneryDay => "Greenery Day",
            NationalHoliday::ChildrensDay => "Children's Day",
            NationalHoliday::MarineDay => "Marine Day",
            NationalHoliday::MountainDay => "Mountain Day",
            NationalHoliday::RespectForTheAgedDay => "Respect for the Aged Day",
            NationalHoliday::AutumnalEquinoxDay => "Autumnal Equinox Day",
            NationalHoliday::SportsDay => "Sports Day",
            NationalHoliday::CultureDay => "Culture Day",
            NationalHoliday::LaborThanksgivingDay => "Labor Thanksgiving Day",
        }
    }
}

/// Why a date is in a [`HolidaySet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Holiday {
    National(NationalHoliday),
    /// Follows a national holiday that fell on a Sunday.
    Substitute,
    /// A weekday wedged between two holidays.
    Citizens,
}

impl Holiday {
    pub fn label(&self) -> &'static str {
        match self {
            Holiday::National(h) => h.name(),
            Holiday::Substitute => "Substitute Holiday",
            Holiday::Citizens => "Citizens' Holiday",
        }
    }
}

/// Every holiday of a single year. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidaySet {
    year: i32,
    days: BTreeMap<NaiveDate, Holiday>,
}

impl HolidaySet {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Lookup by canonical `YYYY-MM-DD` key.
    pub fn contains_key(&self, key: &str) -> bool {
        super::parse_date_key(key).is_some_and(|date| self.contains(date))
    }

    pub fn get(&self, date: NaiveDate) -> Option<Holiday> {
        self.days.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Holidays in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Holiday)> + '_ {
        self.days.iter().map(|(date, holiday)| (*date, *holiday))
    }

    /// Canonical keys in date order.
    pub fn keys(&self) -> Vec<String> {
        self.days.keys().map(|date| date_key(*date)).collect()
    }
}

/// Compute the holidays of `year` from scratch.
///
/// Base holidays come first, then substitute holidays for base holidays
/// that fall on a Sunday, then citizens' holidays. Later passes see the
/// dates added by earlier ones.
pub fn build_holiday_set(year: i32) -> HolidaySet {
    let mut days = base_holidays(year);
    add_substitute_holidays(&mut days);
    add_citizens_holidays(year, &mut days);
    HolidaySet { year, days }
}

fn base_holidays(year: i32) -> BTreeMap<NaiveDate, Holiday> {
    use NationalHoliday::*;

    let mut days = BTreeMap::new();
    let mut add = |month: u32, day: Option<u32>, holiday: NationalHoliday| {
        if let Some(date) = day.and_then(|d| NaiveDate::from_ymd_opt(year, month, d)) {
            days.entry(date).or_insert(Holiday::National(holiday));
        }
    };

    add(1, Some(1), NewYearsDay);
    add(1, nth_weekday_of_month(year, 1, Weekday::Mon, 2), ComingOfAgeDay);
    add(2, Some(11), NationalFoundationDay);
    if year >= 2020 {
        add(2, Some(23), EmperorsBirthday);
    }
    add(3, Some(spring_equinox_day(year)), VernalEquinoxDay);
    add(4, Some(29), ShowaDay);
    add(5, Some(3), ConstitutionMemorialDay);
    add(5, Some(4), GreeneryDay);
    add(5, Some(5), ChildrensDay);

    // Tokyo Olympics moved three holidays in 2020 and 2021.
    match year {
        2020 => add(7, Some(23), MarineDay),
        2021 => add(7, Some(22), MarineDay),
        _ => add(7, nth_weekday_of_month(year, 7, Weekday::Mon, 3), MarineDay),
    }
    match year {
        2020 => add(8, Some(10), MountainDay),
        2021 => add(8, Some(8), MountainDay),
        y if y >= 2016 => add(8, Some(11), MountainDay),
        _ => {}
    }

    add(9, nth_weekday_of_month(year, 9, Weekday::Mon, 3), RespectForTheAgedDay);
    add(9, Some(autumn_equinox_day(year)), AutumnalEquinoxDay);

    match year {
        2020 => add(7, Some(24), SportsDay),
        2021 => add(7, Some(23), SportsDay),
        _ => add(10, nth_weekday_of_month(year, 10, Weekday::Mon, 2), SportsDay),
    }

    add(11, Some(3), CultureDay);
    add(11, Some(23), LaborThanksgivingDay);

    days
}

fn add_substitute_holidays(days: &mut BTreeMap<NaiveDate, Holiday>) {
    let sundays: Vec<NaiveDate> = days
        .keys()
        .copied()
        .filter(|date| date.weekday() == Weekday::Sun)
        .collect();

    for sunday in sundays {
        let mut candidate = sunday.succ_opt();
        while let Some(date) = candidate {
            if !days.contains_key(&date) {
                break;
            }
            candidate = date.succ_opt();
        }
        if let Some(date) = candidate {
            days.insert(date, Holiday::Substitute);
        }
    }
}

fn add_citizens_holidays(year: i32, days: &mut BTreeMap<NaiveDate, Holiday>) {
    for month in 1..=12 {
        let Some(last_day) = last_day_of_month(year, month) else {
            continue;
        };
        // First and last day of a month are never considered.
        for day in 2..last_day {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            if days.contains_key(&date) || date.weekday() == Weekday::Sun {
                continue;
            }
            let flanked = matches!(
                (date.pred_opt(), date.succ_opt()),
                (Some(prev), Some(next)) if days.contains_key(&prev) && days.contains_key(&next)
            );
            if flanked {
                days.insert(date, Holiday::Citizens);
            }
        }
    }
}

/// Day of month of the `nth` `weekday` in the month.
fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, nth: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let target = weekday.num_days_from_sunday();
    let shift = (7 + target - first.weekday().num_days_from_sunday()) % 7;
    Some(1 + shift + (nth.max(1) - 1) * 7)
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    if month == 12 {
        return Some(31);
    }
    NaiveDate::from_ymd_opt(year, month + 1, 1)?
        .pred_opt()
        .map(|date| date.day())
}

pub(crate) fn spring_equinox_day(year: i32) -> u32 {
    if year <= 1979 {
        equinox_day(year, 20.8357, 1983)
    } else {
        equinox_day(year, 20.8431, 1980)
    }
}

pub(crate) fn autumn_equinox_day(year: i32) -> u32 {
    if year <= 1979 {
        equinox_day(year, 23.2588, 1983)
    } else {
        equinox_day(year, 23.2488, 1980)
    }
}

fn equinox_day(year: i32, base: f64, leap_origin: i64) -> u32 {
    let year = i64::from(year);
    let drift = 0.242194 * (year - 1980) as f64;
    let leap = (year - leap_origin).div_euclid(4) as f64;
    // Negative results saturate to 0 and are rejected by from_ymd_opt.
    (base + drift - leap).floor() as u32
}
