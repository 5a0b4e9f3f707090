//! Availability predicate for delivery dates.
//!
//! Bounds are checked first and can never be overridden. Inside the
//! bounds a whitelisted date is always available, otherwise blackout
//! dates and blackout weekdays exclude it.

mod search;

pub use search::{next_available, SearchOutcome, DEFAULT_MAX_SEARCH_ITERATIONS};

use chrono::Datelike;

use crate::models::availability::AvailabilityConfig;
use crate::utils::date::CalendarDate;

/// Returns true when `date` may be chosen under `config`.
pub fn is_available(date: CalendarDate, config: &AvailabilityConfig) -> bool {
    if config.is_out_of_bounds(date) {
        return false;
    }

    if config.is_whitelisted(date) {
        return true;
    }

    if config.is_blackout_date(date) {
        return false;
    }

    !config.is_blackout_weekday(date.weekday())
}
