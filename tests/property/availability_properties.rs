// Property-based tests for the availability engine
// Checks the date rules against random dates and configurations

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use delivery_calendar::models::availability::AvailabilityConfig;
use delivery_calendar::models::calendar::MonthView;
use delivery_calendar::services::availability::{is_available, next_available, SearchOutcome};
use delivery_calendar::utils::date::{days_in_month, weekday_from_sunday_index};
use proptest::prelude::*;

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (1990..2100i32, 1..=12u32, 1..=28u32)
        .prop_map(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day).unwrap())
}

proptest! {
    /// Property: February has 29 days exactly in Gregorian leap years
    #[test]
    fn prop_february_length_follows_leap_rule(year in -4000..4000i32) {
        let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
        prop_assert_eq!(days_in_month(year, 1), if leap { 29 } else { 28 });
    }

    /// Property: a whitelisted date is available whatever the blackouts say
    #[test]
    fn prop_whitelist_overrides_blackouts(date in any_date(), closed in proptest::collection::vec(0..7u32, 0..7)) {
        let config = AvailabilityConfig::new()
            .with_blackout_dates([date])
            .with_blackout_weekdays(closed.into_iter().map(weekday_from_sunday_index))
            .with_whitelist_dates([date]);
        prop_assert!(is_available(date, &config));
    }

    /// Property: nothing outside [min, max] is available, whitelisted or not
    #[test]
    fn prop_bounds_are_never_overridden(
        min in any_date(),
        span in 0..400i64,
        offset in 1..400i64,
        before in any::<bool>(),
    ) {
        let max = min + Duration::days(span);
        let date = if before { min - Duration::days(offset) } else { max + Duration::days(offset) };
        let config = AvailabilityConfig::new()
            .with_whitelist_dates([date])
            .with_min_date(Some(min))
            .with_max_date(Some(max));
        prop_assert!(!is_available(date, &config));
    }

    /// Property: the next available date is after the input and within the search budget
    #[test]
    fn prop_next_available_is_later_and_bounded(
        from in any_date(),
        closed in proptest::collection::vec(0..7u32, 0..7),
        max_iterations in 0..60u32,
    ) {
        let config = AvailabilityConfig::new()
            .with_blackout_weekdays(closed.into_iter().map(weekday_from_sunday_index));
        match next_available(from, &config, max_iterations) {
            SearchOutcome::Found(date) => {
                prop_assert!(date > from);
                prop_assert!((date - from).num_days() <= i64::from(max_iterations));
                prop_assert!(is_available(date, &config));
            }
            SearchOutcome::NotFound => {
                // Every skipped day must have been unavailable
                for offset in 1..=i64::from(max_iterations) {
                    prop_assert!(!is_available(from + Duration::days(offset), &config));
                }
            }
        }
    }

    /// Property: month views roll over into the neighbouring year
    #[test]
    fn prop_month_transition_rolls_year(year in 1900..2200i32) {
        prop_assert_eq!(MonthView::new(year, 12), MonthView { year: year + 1, month: 0 });
        prop_assert_eq!(MonthView::new(year, -1), MonthView { year: year - 1, month: 11 });
        prop_assert_eq!(MonthView::new(year, 11).shifted(1), MonthView { year: year + 1, month: 0 });
        prop_assert_eq!(MonthView::new(year, 0).shifted(-1), MonthView { year: year - 1, month: 11 });
    }
}

#[cfg(test)]
mod additional_tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_christmas_whitelist_scenario() {
        let config = AvailabilityConfig::from_strings(&["2024-12-25"], &["Sunday"], &["2024-12-25"]);
        assert!(is_available(date(2024, 12, 25), &config));
        assert!(!is_available(date(2024, 12, 22), &config));
    }

    #[test]
    fn test_fully_closed_week_gives_not_found() {
        let config = AvailabilityConfig::new().with_blackout_weekdays(ALL_WEEKDAYS);
        assert_eq!(
            next_available(date(2024, 1, 1), &config, 100),
            SearchOutcome::NotFound
        );
    }

    #[test]
    fn test_next_available_skips_closed_weekend() {
        let config = AvailabilityConfig::new().with_blackout_weekdays([Weekday::Sat, Weekday::Sun]);
        let found = next_available(date(2024, 3, 8), &config, 100).found().unwrap();
        assert_eq!(found, date(2024, 3, 11));
        assert_eq!(found.weekday(), Weekday::Mon);
    }
}
