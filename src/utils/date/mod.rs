// Date utility functions
// Calendar-day arithmetic shared by the picker, the switcher and the timer

mod format;
mod timezone;

pub use format::{format_date, full_date_string, month_name, weekday_name, NameStyle};
pub use timezone::{resolve_vendor_timezone, vendor_day_start, vendor_today, DEFAULT_VENDOR_TIMEZONE};

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

/// A calendar day without time of day. Ordering is calendar identity.
pub type CalendarDate = NaiveDate;

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    Format(String),
    #[error("date '{0}' does not exist")]
    OutOfRange(String),
    #[error("unknown weekday name '{0}'")]
    UnknownWeekday(String),
}

/// Gregorian leap rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (0 = January) of `year`.
///
/// Months outside 0..=11 are rolled into the neighbouring year first.
pub fn days_in_month(year: i32, month: i32) -> u32 {
    let (year, month) = normalize_month(year, month);
    if month == 1 && is_leap_year(year) {
        29
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Rolls a zero-based month index into `0..=11`, adjusting the year.
pub fn normalize_month(year: i32, month: i32) -> (i32, i32) {
    (year + month.div_euclid(12), month.rem_euclid(12))
}

/// Parses a strict `YYYY-MM-DD` string.
pub fn parse_iso_date(value: &str) -> Result<CalendarDate, DateError> {
    let parts: Vec<&str> = value.trim().split('-').collect();
    if parts.len() != 3 {
        return Err(DateError::Format(value.to_string()));
    }

    let mut numbers = [0u32; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(DateError::Format(value.to_string()));
        }
        *slot = part
            .parse()
            .map_err(|_| DateError::Format(value.to_string()))?;
    }

    let year = i32::try_from(numbers[0]).map_err(|_| DateError::Format(value.to_string()))?;
    NaiveDate::from_ymd_opt(year, numbers[1], numbers[2])
        .ok_or_else(|| DateError::OutOfRange(value.to_string()))
}

/// Parses the value of an existing form field.
///
/// Accepts ISO dates, `MM/DD/YYYY` (the delivery field format) and
/// `March 5, 2024` (the picker's default display format).
pub fn parse_form_value(value: &str) -> Option<CalendarDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    parse_iso_date(value)
        .ok()
        .or_else(|| NaiveDate::parse_from_str(value, "%m/%d/%Y").ok())
        .or_else(|| NaiveDate::parse_from_str(value, "%B %d, %Y").ok())
}

/// Parses a list of ISO date strings, skipping (and logging) malformed ones.
pub fn parse_date_list<S: AsRef<str>>(values: &[S]) -> Vec<CalendarDate> {
    values
        .iter()
        .filter_map(|value| match parse_iso_date(value.as_ref()) {
            Ok(date) => Some(date),
            Err(err) => {
                log::warn!("Ignoring configured date: {}", err);
                None
            }
        })
        .collect()
}

/// Parses a weekday from its long English name, case-insensitively.
pub fn parse_weekday_name(name: &str) -> Result<Weekday, DateError> {
    let trimmed = name.trim();
    (0..7)
        .map(weekday_from_sunday_index)
        .find(|weekday| weekday_name(*weekday, NameStyle::Long).eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| DateError::UnknownWeekday(name.to_string()))
}

/// Maps `0 = Sunday .. 6 = Saturday` onto chrono's weekday.
pub fn weekday_from_sunday_index(index: u32) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

/// Compares two dates by calendar identity only.
pub fn compare_dates(a: CalendarDate, b: CalendarDate) -> Ordering {
    (a.year(), a.month(), a.day()).cmp(&(b.year(), b.month(), b.day()))
}

/// Builds a date from a zero-based month view and a day of month.
pub fn date_in_view(year: i32, month: i32, day: u32) -> Option<CalendarDate> {
    let (year, month) = normalize_month(year, month);
    NaiveDate::from_ymd_opt(year, month as u32 + 1, day)
}
