// Settings module
// Typed configuration for every widget, deserialised from TOML

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Complete widget configuration. Every section falls back to its own
/// defaults, so a file only overrides the fields it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    pub calendar: CalendarSettings,
    pub delivery: DeliverySettings,
    pub fee: FeeSettings,
    pub timer: TimerSettings,
    pub order: OrderSettings,
    pub pricing: PricingSettings,
}

impl WidgetSettings {
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.calendar.first_day_of_week > 6 {
            return Err(SettingsError::Invalid {
                field: "calendar.first_day_of_week",
                reason: format!("{} is not in 0..=6", self.calendar.first_day_of_week),
            });
        }

        if self.calendar.date_format.trim().is_empty() {
            return Err(SettingsError::Invalid {
                field: "calendar.date_format",
                reason: "must not be empty".to_string(),
            });
        }

        if self.delivery.switcher.max_search_iteration == 0 {
            return Err(SettingsError::Invalid {
                field: "delivery.switcher.max_search_iteration",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.fee.timeout_secs == 0 {
            return Err(SettingsError::Invalid {
                field: "fee.timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        let prices = std::iter::once(self.pricing.base_price)
            .chain(self.pricing.options.iter().map(|option| option.price));
        for price in prices {
            if !price.is_finite() || price < 0.0 {
                return Err(SettingsError::Invalid {
                    field: "pricing",
                    reason: format!("price {} must be a non-negative number", price),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    pub date_format: String,
    pub alt_format: Option<String>,
    /// 0 = Sunday
    pub first_day_of_week: u8,
    pub shorthand_current_month: bool,
    pub minimal_weekday_label: bool,
    pub use_arrows: bool,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            date_format: "m/d/Y".to_string(),
            alt_format: Some("m/d/Y".to_string()),
            first_day_of_week: 0,
            shorthand_current_month: false,
            minimal_weekday_label: false,
            use_arrows: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliverySettings {
    pub vendor_timezone: Option<String>,
    /// ISO date overriding the vendor's "today".
    pub vendor_today_date: Option<String>,
    pub closed_days: Vec<String>,
    pub closed_dates: Vec<String>,
    pub blackout_dates: Vec<String>,
    pub whitelist_dates: Vec<String>,
    pub pickup_only_dates: Vec<String>,
    pub today_delivery_available: bool,
    /// Same-day cutoff as unix milliseconds.
    pub cutoff_timestamp: Option<i64>,
    /// Date preselected on a previous page, as an ISO string.
    pub delivery_date: Option<String>,
    pub delivery_only: bool,
    pub switcher: SwitcherSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitcherSettings {
    pub count_default_buttons: usize,
    pub use_today_button: bool,
    pub max_search_iteration: u32,
}

impl Default for SwitcherSettings {
    fn default() -> Self {
        Self {
            count_default_buttons: 2,
            use_today_button: true,
            max_search_iteration: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSettings {
    pub url: Option<String>,
    pub timeout_secs: u64,
    /// Extra form fields posted with every lookup.
    pub data: BTreeMap<String, String>,
    pub messages: FeeMessages,
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 20,
            data: BTreeMap::new(),
            messages: FeeMessages::default(),
        }
    }
}

/// Fee panel texts. An empty template counts as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeMessages {
    pub initial: String,
    pub found: String,
    pub box_found: String,
    pub found_and_free: String,
    pub box_found_and_free: String,
    pub not_found: String,
    pub box_not_found: String,
    pub zone_disabled: String,
    pub error: String,
}

impl Default for FeeMessages {
    fn default() -> Self {
        Self {
            initial: "Add a zip code for delivery details".to_string(),
            found: "${fee} Hand delivery for {zip}".to_string(),
            box_found: "Shipping starting from ${fee} for {zip}".to_string(),
            found_and_free: "FREE Hand delivery for {zip}".to_string(),
            box_found_and_free: "Shipping starting from $0.00 for {zip}".to_string(),
            not_found: "Oh no! The florist does not deliver to {zip}".to_string(),
            box_not_found: "Oh no! The florist does not ship to {zip}".to_string(),
            zone_disabled:
                "Oh no! The florist does not deliver to {zip} on your selected date. Try another day."
                    .to_string(),
            error: "Unknown error, please try again later.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    pub messages: TimerMessages,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerMessages {
    pub default: String,
    pub only_minutes: String,
    pub only_seconds: String,
}

impl Default for TimerMessages {
    fn default() -> Self {
        Self {
            default: "Need it today? Order within {hours} hrs {minutes} mins.".to_string(),
            only_minutes: "Need it today? Order within {minutes} mins {seconds} secs.".to_string(),
            only_seconds: "Need it today? Order within {seconds} secs.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderSettings {
    /// Whether the product is for sale at all.
    pub status: bool,
    pub messages: OrderMessages,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            status: true,
            messages: OrderMessages::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderMessages {
    pub error_select_date: String,
    pub not_available: String,
    pub delivery_not_available: String,
    pub same_day_cutoff_passed: String,
}

impl Default for OrderMessages {
    fn default() -> Self {
        Self {
            error_select_date: "Please select a delivery date.".to_string(),
            not_available: "This is not available for sale.".to_string(),
            delivery_not_available:
                "Sorry same day deliver is unavailable in {zip}. Select a new Date or Zip."
                    .to_string(),
            same_day_cutoff_passed:
                "The same-day cutoff has passed. Please choose another delivery date.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    pub base_price: f64,
    pub options: Vec<PricingOption>,
    pub changes: Vec<PricingChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingOption {
    pub price: f64,
    pub upgrade: String,
    pub description: String,
}

/// A dated price adjustment, e.g. a holiday surcharge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingChange {
    pub from_date: String,
    pub to_date: String,
    pub price: f64,
    #[serde(rename = "type", default)]
    pub kind: PricingChangeKind,
    #[serde(default)]
    pub action: PricingChangeAction,
    #[serde(default)]
    pub surge_flag: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingChangeKind {
    Percent,
    #[default]
    Fixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingChangeAction {
    #[default]
    Inc,
    Dec,
}
