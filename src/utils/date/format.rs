//! Token-based date formatting used for field values and button labels.
//!
//! Supported tokens: `d D j l w F m M n U y Y`. A backslash emits the
//! next character verbatim.

use chrono::{Datelike, Weekday};

use super::CalendarDate;

const WEEKDAYS_MINIMAL: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const WEEKDAYS_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const WEEKDAYS_LONG: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    Minimal,
    Short,
    Long,
}

pub fn weekday_name(weekday: Weekday, style: NameStyle) -> &'static str {
    let index = weekday.num_days_from_sunday() as usize;
    match style {
        NameStyle::Minimal => WEEKDAYS_MINIMAL[index],
        NameStyle::Short => WEEKDAYS_SHORT[index],
        NameStyle::Long => WEEKDAYS_LONG[index],
    }
}

/// Month name for a zero-based month index. Minimal falls back to short.
pub fn month_name(month: u32, style: NameStyle) -> &'static str {
    let index = (month % 12) as usize;
    match style {
        NameStyle::Long => MONTHS_LONG[index],
        NameStyle::Short | NameStyle::Minimal => MONTHS_SHORT[index],
    }
}

/// Formats `date` with the picker token grammar.
///
/// ```
/// use chrono::NaiveDate;
/// use delivery_calendar::utils::date::format_date;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(format_date("F j, Y", date), "March 5, 2024");
/// ```
pub fn format_date(pattern: &str, date: CalendarDate) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut escaped = false;

    for piece in pattern.chars() {
        if escaped {
            out.push(piece);
            escaped = false;
            continue;
        }
        if piece == '\\' {
            escaped = true;
            continue;
        }

        match piece {
            'd' => out.push_str(&format!("{:02}", date.day())),
            'D' => out.push_str(weekday_name(date.weekday(), NameStyle::Short)),
            'j' => out.push_str(&date.day().to_string()),
            'l' => out.push_str(weekday_name(date.weekday(), NameStyle::Long)),
            'w' => out.push_str(&date.weekday().num_days_from_sunday().to_string()),
            'F' => out.push_str(month_name(date.month0(), NameStyle::Long)),
            'm' => out.push_str(&format!("{:02}", date.month())),
            'M' => out.push_str(month_name(date.month0(), NameStyle::Short)),
            'n' => out.push_str(&date.month().to_string()),
            // Midnight UTC of the calendar day
            'U' => out.push_str(&date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp().to_string()),
            'y' => out.push_str(&format!("{:02}", date.year().rem_euclid(100))),
            'Y' => out.push_str(&date.year().to_string()),
            other => out.push(other),
        }
    }

    out
}

/// `Tuesday, March 5, 2024`, the wording used in accessible labels.
pub fn full_date_string(date: CalendarDate) -> String {
    format_date("l, F j, Y", date)
}
