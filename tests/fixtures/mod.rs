// Test fixtures - reusable test data
// Provides consistent clocks, settings and fee endpoints across test files

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Sample instants and dates for testing
pub mod clock {
    use super::*;

    /// Tuesday March 5, 2024 at 10:00 in Los Angeles
    pub fn tuesday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap()
    }

    /// Tuesday March 5, 2024 just before midnight in Los Angeles
    pub fn tuesday_late_night() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 6, 7, 30, 0).unwrap()
    }

    pub fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }
}

/// Sample widget settings
pub mod settings {
    use delivery_calendar::models::settings::{PricingOption, WidgetSettings};

    /// Closed on Sundays, no same-day window until a fee lookup opens one
    pub fn closed_sundays() -> WidgetSettings {
        let mut settings = WidgetSettings::default();
        settings.delivery.closed_days = vec!["Sunday".to_string()];
        settings
    }

    /// Closed Sundays plus a blackout on March 8th and two price options
    pub fn florist() -> WidgetSettings {
        let mut settings = closed_sundays();
        settings.delivery.blackout_dates = vec!["2024-03-08".to_string()];
        settings.pricing.base_price = 50.0;
        settings.pricing.options = vec![
            PricingOption {
                price: 50.0,
                upgrade: "standard".to_string(),
                description: "Standard".to_string(),
            },
            PricingOption {
                price: 75.0,
                upgrade: "premium".to_string(),
                description: "Premium".to_string(),
            },
        ];
        settings
    }

    pub const FLORIST_TOML: &str = r#"
[calendar]
first_day_of_week = 1

[delivery]
vendor_timezone = "CST"
closed_days = ["Sunday", "Monday"]
closed_dates = ["2024-03-07"]
whitelist_dates = ["2024-03-10"]

[delivery.switcher]
count_default_buttons = 3

[pricing]
base_price = 30.0

[[pricing.options]]
price = 30.0
upgrade = "standard"
description = "Standard"
"#;
}

/// Canned fee endpoints
pub mod fee {
    use std::sync::Mutex;

    use chrono::{DateTime, Utc};
    use delivery_calendar::services::fee::{FeeLookup, FeeLookupError, FeeRequest, FeeResponse};

    /// Answers every lookup with the same response and records the requests.
    pub struct StubFeeLookup {
        response: Option<FeeResponse>,
        requests: Mutex<Vec<FeeRequest>>,
    }

    impl StubFeeLookup {
        pub fn answering(response: FeeResponse) -> Self {
            Self {
                response: Some(response),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Every lookup fails with a 503.
        pub fn unavailable() -> Self {
            Self {
                response: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<FeeRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl FeeLookup for StubFeeLookup {
        fn lookup(&self, request: &FeeRequest) -> Result<FeeResponse, FeeLookupError> {
            self.requests.lock().unwrap().push(request.clone());
            self.response.clone().ok_or(FeeLookupError::Status(503))
        }
    }

    /// Hand delivery for a fee, with same-day open until `cutoff`.
    pub fn same_day_until(cutoff: DateTime<Utc>, fee: f64) -> FeeResponse {
        FeeResponse {
            success: true,
            delivery: true,
            fee: Some(fee),
            same_day_available: true,
            cutoff_timestamp: Some(cutoff.timestamp_millis()),
            ..FeeResponse::default()
        }
    }
}
