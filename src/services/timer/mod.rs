//! Same-day cutoff countdown.
//!
//! One repeating one-second schedule recomputes the time left until the
//! cutoff. Reaching zero stops the schedule and reports expiry once.
//! Starting always stops the previous schedule first, so at most one
//! ticker is ever live.

mod ticker;

pub use ticker::{ManualScheduler, ThreadScheduler, Tick, TickHandle, TickScheduler};

use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};

use crate::models::settings::TimerMessages;
use crate::utils::message::fill_template;

pub const TICK_PERIOD: StdDuration = StdDuration::from_secs(1);

/// Time left until the cutoff, split for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Remaining {
    pub hours: i64,
    /// Minutes within the hour.
    pub minutes: i64,
    /// Seconds within the minute.
    pub seconds: i64,
}

impl Remaining {
    pub fn until(cutoff: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_seconds((cutoff - now).num_seconds())
    }

    pub fn from_seconds(total: i64) -> Self {
        let total = total.max(0);
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTick {
    Running { remaining: Remaining, text: String },
    /// The cutoff passed on this tick; the schedule has been stopped.
    Expired,
    /// No countdown is running.
    Idle,
}

pub struct CountdownTimer {
    messages: TimerMessages,
    scheduler: Box<dyn TickScheduler>,
    handle: Option<TickHandle>,
    cutoff: Option<DateTime<Utc>>,
    text: Option<String>,
}

impl CountdownTimer {
    pub fn new(messages: TimerMessages, scheduler: Box<dyn TickScheduler>) -> Self {
        Self {
            messages,
            scheduler,
            handle: None,
            cutoff: None,
            text: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Id of the live schedule, if any.
    pub fn ticker_id(&self) -> Option<u64> {
        self.handle.as_ref().map(TickHandle::id)
    }

    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.cutoff
    }

    /// Text to display, `None` while the widget is hidden.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Hides the widget and cancels the live schedule.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
            log::info!("Stopped countdown ticker {}", handle.id());
        }
        self.text = None;
    }

    /// Restarts the countdown towards `cutoff`.
    ///
    /// The previous schedule is always replaced. Nothing is scheduled when
    /// same-day delivery is not permitted or the cutoff already passed.
    pub fn start(&mut self, cutoff: DateTime<Utc>, now: DateTime<Utc>, same_day_permitted: bool) -> TimerTick {
        self.stop();
        self.cutoff = Some(cutoff);
        if !same_day_permitted {
            return TimerTick::Idle;
        }

        let first = self.compute(now);
        if let TimerTick::Running { .. } = first {
            self.handle = Some(self.scheduler.schedule_repeating(TICK_PERIOD));
            log::info!("Started countdown to {} ({:?})", cutoff, self.ticker_id());
        }
        first
    }

    /// Handles a tick from a schedule, ignoring ticks from stale ones.
    pub fn on_tick(&mut self, tick: Tick, now: DateTime<Utc>) -> TimerTick {
        if self.ticker_id() != Some(tick.ticker) {
            log::debug!("Ignoring tick from stale ticker {}", tick.ticker);
            return TimerTick::Idle;
        }
        self.tick(now)
    }

    /// Recomputes the remaining time at `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TimerTick {
        if !self.is_running() {
            return TimerTick::Idle;
        }
        self.compute(now)
    }

    fn compute(&mut self, now: DateTime<Utc>) -> TimerTick {
        let Some(cutoff) = self.cutoff else {
            return TimerTick::Idle;
        };

        let remaining = Remaining::until(cutoff, now);
        if remaining.total_seconds() <= 0 {
            self.stop();
            log::info!("Same-day cutoff {} reached", cutoff);
            return TimerTick::Expired;
        }

        let text = self.format(remaining);
        self.text = Some(text.clone());
        TimerTick::Running { remaining, text }
    }

    fn format(&self, remaining: Remaining) -> String {
        let template = if remaining.hours > 0 {
            &self.messages.default
        } else if remaining.minutes > 0 {
            &self.messages.only_minutes
        } else {
            &self.messages.only_seconds
        };

        fill_template(
            template,
            &[
                ("hours", &remaining.hours.to_string()),
                ("minutes", &remaining.minutes.to_string()),
                ("seconds", &remaining.seconds.to_string()),
            ],
        )
    }
}
