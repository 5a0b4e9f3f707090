// Availability model
// Which calendar days may be chosen for delivery

use std::collections::{BTreeSet, HashSet};

use chrono::Weekday;

use crate::utils::date::{parse_date_list, parse_weekday_name, CalendarDate};

/// Blackout and whitelist rules for delivery dates.
///
/// Built once from configuration strings and never mutated afterwards;
/// derived configurations (e.g. with new bounds) are new values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityConfig {
    blackout_dates: BTreeSet<CalendarDate>,
    blackout_weekdays: HashSet<Weekday>,
    whitelist_dates: BTreeSet<CalendarDate>,
    min_date: Option<CalendarDate>,
    max_date: Option<CalendarDate>,
}

impl AvailabilityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from ISO date strings and weekday names.
    ///
    /// Malformed dates and unknown weekday names are skipped.
    pub fn from_strings<D, W, A>(omit_dates: &[D], omit_days: &[W], active_dates: &[A]) -> Self
    where
        D: AsRef<str>,
        W: AsRef<str>,
        A: AsRef<str>,
    {
        let blackout_weekdays = omit_days
            .iter()
            .filter_map(|name| match parse_weekday_name(name.as_ref()) {
                Ok(weekday) => Some(weekday),
                Err(err) => {
                    log::warn!("Ignoring closed day: {}", err);
                    None
                }
            })
            .collect();

        Self {
            blackout_dates: parse_date_list(omit_dates).into_iter().collect(),
            blackout_weekdays,
            whitelist_dates: parse_date_list(active_dates).into_iter().collect(),
            min_date: None,
            max_date: None,
        }
    }

    pub fn with_blackout_dates(mut self, dates: impl IntoIterator<Item = CalendarDate>) -> Self {
        self.blackout_dates.extend(dates);
        self
    }

    pub fn with_blackout_weekdays(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.blackout_weekdays.extend(weekdays);
        self
    }

    pub fn with_whitelist_dates(mut self, dates: impl IntoIterator<Item = CalendarDate>) -> Self {
        self.whitelist_dates.extend(dates);
        self
    }

    pub fn with_min_date(mut self, min_date: Option<CalendarDate>) -> Self {
        self.min_date = min_date;
        self
    }

    pub fn with_max_date(mut self, max_date: Option<CalendarDate>) -> Self {
        self.max_date = max_date;
        self
    }

    pub fn blackout_dates(&self) -> &BTreeSet<CalendarDate> {
        &self.blackout_dates
    }

    pub fn blackout_weekdays(&self) -> &HashSet<Weekday> {
        &self.blackout_weekdays
    }

    pub fn whitelist_dates(&self) -> &BTreeSet<CalendarDate> {
        &self.whitelist_dates
    }

    pub fn min_date(&self) -> Option<CalendarDate> {
        self.min_date
    }

    pub fn max_date(&self) -> Option<CalendarDate> {
        self.max_date
    }

    pub fn is_whitelisted(&self, date: CalendarDate) -> bool {
        self.whitelist_dates.contains(&date)
    }

    pub fn is_blackout_date(&self, date: CalendarDate) -> bool {
        self.blackout_dates.contains(&date)
    }

    pub fn is_blackout_weekday(&self, weekday: Weekday) -> bool {
        self.blackout_weekdays.contains(&weekday)
    }

    /// True when `date` lies outside the configured min/max bounds.
    pub fn is_out_of_bounds(&self, date: CalendarDate) -> bool {
        self.min_date.is_some_and(|min| date < min) || self.max_date.is_some_and(|max| date > max)
    }
}
