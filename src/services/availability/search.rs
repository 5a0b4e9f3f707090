// Bounded forward search for the next available delivery date

use crate::models::availability::AvailabilityConfig;
use crate::utils::date::CalendarDate;

use super::is_available;

pub const DEFAULT_MAX_SEARCH_ITERATIONS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(CalendarDate),
    /// No available date within the search budget.
    NotFound,
}

impl SearchOutcome {
    pub fn found(self) -> Option<CalendarDate> {
        match self {
            Self::Found(date) => Some(date),
            Self::NotFound => None,
        }
    }
}

/// Finds the first available date strictly after `from`.
///
/// Checks at most `max_iterations` days; a configuration with no
/// available date in that horizon yields `NotFound` instead of looping.
pub fn next_available(
    from: CalendarDate,
    config: &AvailabilityConfig,
    max_iterations: u32,
) -> SearchOutcome {
    let mut candidate = from;
    for _ in 0..max_iterations {
        candidate = match candidate.succ_opt() {
            Some(next) => next,
            None => return SearchOutcome::NotFound,
        };
        if is_available(candidate, config) {
            return SearchOutcome::Found(candidate);
        }
    }

    log::debug!(
        "No available date within {} days after {}",
        max_iterations,
        from
    );
    SearchOutcome::NotFound
}
