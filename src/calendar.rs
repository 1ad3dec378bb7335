//! Month and weekday names used by the derived columns and the filters.

use chrono::{Datelike, Month, NaiveDateTime, Weekday};

pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

pub const WEEKDAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Lowercase English name of `month`.
pub fn month_name(month: Month) -> &'static str {
    MONTH_NAMES[month.number_from_month() as usize - 1]
}

/// Lowercase English name of `weekday`.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
}

pub fn parse_month(name: &str) -> Option<Month> {
    let name = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|i| MONTHS[i])
}

pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let name = name.trim().to_lowercase();
    WEEKDAY_NAMES
        .iter()
        .position(|d| *d == name)
        .map(|i| WEEKDAYS[i])
}

pub fn month_of(timestamp: &NaiveDateTime) -> Month {
    MONTHS[timestamp.month0() as usize]
}

pub fn weekday_of(timestamp: &NaiveDateTime) -> Weekday {
    timestamp.weekday()
}
