// Vendor timezone helpers

use chrono::{DateTime, LocalResult, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::CalendarDate;

pub const DEFAULT_VENDOR_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

/// Resolves the vendor timezone name used by the storefront.
///
/// Accepts the `CST`/`PST`/`AKST` shorthands and any IANA name. Empty or
/// unrecognised names fall back to Pacific time.
pub fn resolve_vendor_timezone(name: Option<&str>) -> Tz {
    let name = name.map(str::trim).unwrap_or_default();
    match name {
        "" => DEFAULT_VENDOR_TIMEZONE,
        "CST" => chrono_tz::America::Chicago,
        "PST" => chrono_tz::America::Los_Angeles,
        "AKST" => chrono_tz::America::Anchorage,
        other => other.parse::<Tz>().unwrap_or_else(|_| {
            log::warn!(
                "Unknown vendor timezone '{}', falling back to {}",
                other,
                DEFAULT_VENDOR_TIMEZONE
            );
            DEFAULT_VENDOR_TIMEZONE
        }),
    }
}

/// The vendor's calendar day at instant `now`.
pub fn vendor_today(now: DateTime<Utc>, tz: Tz) -> CalendarDate {
    now.with_timezone(&tz).date_naive()
}

/// The first instant of `day` in the vendor's timezone.
pub fn vendor_day_start(day: CalendarDate, tz: Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(start) => start.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Midnight skipped by a DST jump; the day starts one hour later
        LocalResult::None => tz
            .from_local_datetime(&(midnight + chrono::Duration::hours(1)))
            .earliest()
            .map(|start| start.with_timezone(&Utc))
            .unwrap_or_else(|| midnight.and_utc()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_case::test_case;

    #[test_case(Some("CST"), chrono_tz::America::Chicago)]
    #[test_case(Some("PST"), chrono_tz::America::Los_Angeles)]
    #[test_case(Some("AKST"), chrono_tz::America::Anchorage)]
    #[test_case(Some("America/New_York"), chrono_tz::America::New_York)]
    #[test_case(Some("Mars/Olympus"), DEFAULT_VENDOR_TIMEZONE)]
    #[test_case(Some(""), DEFAULT_VENDOR_TIMEZONE)]
    #[test_case(None, DEFAULT_VENDOR_TIMEZONE)]
    fn test_resolve_vendor_timezone(name: Option<&str>, expected: Tz) {
        assert_eq!(resolve_vendor_timezone(name), expected);
    }

    #[test]
    fn test_vendor_today_crosses_date_line() {
        // 03:00 UTC on March 6 is still March 5 in Los Angeles
        let now = Utc.with_ymd_and_hms(2024, 3, 6, 3, 0, 0).unwrap();
        assert_eq!(
            vendor_today(now, DEFAULT_VENDOR_TIMEZONE),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn test_vendor_day_start() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let start = vendor_day_start(day, DEFAULT_VENDOR_TIMEZONE);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap());
    }
}
