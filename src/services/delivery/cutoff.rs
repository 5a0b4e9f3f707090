use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::availability::AvailabilityConfig;
use crate::services::availability::is_available;
use crate::services::fee::FeeUpdate;
use crate::utils::date::{vendor_day_start, CalendarDate};

/// Same-day delivery window as last reported by the fee endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CutoffState {
    pub cutoff: Option<DateTime<Utc>>,
    pub same_day_available: bool,
}

impl CutoffState {
    pub fn new(cutoff: Option<DateTime<Utc>>, same_day_available: bool) -> Self {
        Self {
            cutoff,
            same_day_available,
        }
    }

    /// Builds the state from a unix-milliseconds cutoff.
    pub fn from_millis(cutoff_timestamp: Option<i64>, same_day_available: bool) -> Self {
        let cutoff = cutoff_timestamp.and_then(|millis| Utc.timestamp_millis_opt(millis).single());
        Self::new(cutoff, same_day_available)
    }

    /// At least one whole second remains, matching the countdown's
    /// resolution.
    pub fn is_before_cutoff(&self, now: DateTime<Utc>) -> bool {
        self.cutoff
            .is_some_and(|cutoff| (cutoff - now).num_seconds() > 0)
    }

    /// Same-day delivery is permitted iff the flag is on, `today` is
    /// available, the cutoff is still ahead and the vendor's day has begun.
    pub fn permits_same_day(
        &self,
        today: CalendarDate,
        tz: Tz,
        availability: &AvailabilityConfig,
        now: DateTime<Utc>,
    ) -> bool {
        self.same_day_available
            && is_available(today, availability)
            && self.is_before_cutoff(now)
            && now > vendor_day_start(today, tz)
    }
}

impl From<&FeeUpdate> for CutoffState {
    fn from(update: &FeeUpdate) -> Self {
        Self::new(update.cutoff, update.same_day_available)
    }
}
