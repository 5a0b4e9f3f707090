// Unit tests for the date helpers shared by the picker and the delivery widgets

use chrono::{NaiveDate, Utc, TimeZone};
use delivery_calendar::utils::date::{
    compare_dates, date_in_view, days_in_month, format_date, parse_form_value, parse_iso_date,
    parse_weekday_name, resolve_vendor_timezone, vendor_day_start, vendor_today, DateError,
};
use delivery_calendar::utils::message::{fill_template, format_price};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn march_5() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

#[test_case("Y-m-d", "2024-03-05" ; "iso")]
#[test_case("F j, Y", "March 5, 2024" ; "long")]
#[test_case("m/d/Y", "03/05/2024" ; "delivery field")]
#[test_case("D M j", "Tue Mar 5" ; "quick pick")]
#[test_case("\\d\\a\\y j", "day 5" ; "escaped")]
fn test_format_date(pattern: &str, expected: &str) {
    assert_eq!(format_date(pattern, march_5()), expected);
}

#[test_case(2024, 1, 29 ; "leap february")]
#[test_case(2023, 1, 28 ; "plain february")]
#[test_case(1900, 1, 28 ; "century")]
#[test_case(2000, 1, 29 ; "four hundred")]
#[test_case(2024, 12, 31 ; "rolls into january")]
#[test_case(2024, -1, 31 ; "rolls into december")]
fn test_days_in_month(year: i32, month: i32, expected: u32) {
    assert_eq!(days_in_month(year, month), expected);
}

#[test]
fn test_parse_iso_date_errors() {
    assert_eq!(parse_iso_date("2024-03-05"), Ok(march_5()));
    assert_eq!(
        parse_iso_date("03/05/2024"),
        Err(DateError::Format("03/05/2024".to_string()))
    );
    assert_eq!(
        parse_iso_date("2023-02-29"),
        Err(DateError::OutOfRange("2023-02-29".to_string()))
    );
}

#[test]
fn test_parse_form_value_formats() {
    assert_eq!(parse_form_value("03/05/2024"), Some(march_5()));
    assert_eq!(parse_form_value("March 5, 2024"), Some(march_5()));
    assert_eq!(parse_form_value("  "), None);
    assert_eq!(parse_form_value("next week"), None);
}

#[test]
fn test_weekday_names() {
    assert_eq!(parse_weekday_name("sunday"), Ok(chrono::Weekday::Sun));
    assert!(parse_weekday_name("Funday").is_err());
}

#[test]
fn test_date_in_view_and_compare() {
    assert_eq!(date_in_view(2023, 14, 5), Some(march_5()));
    assert_eq!(date_in_view(2024, 1, 30), None);
    assert_eq!(
        compare_dates(march_5(), NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()),
        std::cmp::Ordering::Less
    );
}

#[test]
fn test_vendor_day_in_chicago() {
    let tz = resolve_vendor_timezone(Some("CST"));
    // 03:00 UTC on the 6th is still the evening of the 5th in Chicago
    let now = Utc.with_ymd_and_hms(2024, 3, 6, 3, 0, 0).unwrap();
    assert_eq!(vendor_today(now, tz), march_5());
    assert_eq!(
        vendor_day_start(march_5(), tz),
        Utc.with_ymd_and_hms(2024, 3, 5, 6, 0, 0).unwrap()
    );
}

#[test]
fn test_message_helpers() {
    assert_eq!(
        fill_template("${fee} Hand delivery for {zip}", &[("zip", "60601"), ("fee", "9.99")]),
        "$9.99 Hand delivery for 60601"
    );
    assert_eq!(format_price(12.5, 2, true), "$12.50");
    assert_eq!(format_price(12.5, 2, false), "12.50");
}
