//! Delivery orchestrator.
//!
//! Owns the chosen delivery date and keeps the quick-pick row, the date
//! picker, the fee panel and the same-day countdown consistent with it.
//! Sub-widgets are plain fields; their events come back as return values
//! and are handled here by direct calls.

mod cutoff;
mod pickup;
mod switcher;

pub use cutoff::CutoffState;
pub use pickup::{apply_pickup_rules, DeliveryPanel, PickupState, SubmitButton};
pub use switcher::{
    available_aria_label, unavailable_aria_label, ButtonKind, CalendarButtonText, SwitchButton,
    Switcher,
};

use std::collections::BTreeSet;

use chrono::{DateTime, Months, Utc};
use chrono_tz::Tz;

use crate::models::availability::AvailabilityConfig;
use crate::models::calendar::{CalendarEvent, CalendarGrid, ClickTarget, FocusTarget, Key, KeyOutcome};
use crate::models::settings::{OrderMessages, SwitcherSettings, WidgetSettings};
use crate::services::calendar::{DatePicker, DatePickerOptions};
use crate::services::fee::{FeeUpdate, FeeWidget};
use crate::services::timer::{CountdownTimer, Tick, TickScheduler, TimerTick};
use crate::utils::date::{
    format_date, parse_date_list, parse_iso_date, resolve_vendor_timezone, vendor_today,
    CalendarDate,
};
use crate::utils::message::fill_template;

/// Format of the delivery date field posted with the order.
pub const DELIVERY_FIELD_FORMAT: &str = "m/d/Y";

/// Something the order widget or a front end should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryEvent {
    /// The delivery field changed.
    DateChanged(Option<CalendarDate>),
    /// Same-day delivery was chosen but is not possible.
    DeliveryUnavailable { message: String },
    /// The active today button was disabled at the cutoff.
    CutoffPassed { message: String },
    CalendarOpened,
    CalendarClosed,
}

pub struct DeliveryOrchestrator {
    tz: Tz,
    today_override: Option<CalendarDate>,
    today: CalendarDate,
    availability: AvailabilityConfig,
    pickup_only_dates: BTreeSet<CalendarDate>,
    delivery_only: bool,
    switcher_settings: SwitcherSettings,
    switcher: Switcher,
    picker: DatePicker,
    timer: CountdownTimer,
    fee: Option<FeeWidget>,
    cutoff: CutoffState,
    preselected: Option<CalendarDate>,
    chosen: Option<CalendarDate>,
    notice: Option<String>,
    messages: OrderMessages,
    min_available: CalendarDate,
    pickup: PickupState,
}

impl DeliveryOrchestrator {
    pub fn new(
        settings: &WidgetSettings,
        fee: Option<FeeWidget>,
        scheduler: Box<dyn TickScheduler>,
        now: DateTime<Utc>,
    ) -> Self {
        let delivery = &settings.delivery;
        let tz = resolve_vendor_timezone(delivery.vendor_timezone.as_deref());
        let today_override = delivery
            .vendor_today_date
            .as_deref()
            .and_then(|value| match parse_iso_date(value) {
                Ok(date) => Some(date),
                Err(err) => {
                    log::warn!("Ignoring vendor_today_date: {}", err);
                    None
                }
            });
        let today = today_override.unwrap_or_else(|| vendor_today(now, tz));

        // Closed and blackout dates are both omitted from the calendar
        let mut omitted = delivery.closed_dates.clone();
        omitted.extend(delivery.blackout_dates.iter().cloned());
        omitted.sort();
        omitted.dedup();
        let availability =
            AvailabilityConfig::from_strings(&omitted, &delivery.closed_days, &delivery.whitelist_dates);

        let preselected = delivery
            .delivery_date
            .as_deref()
            .and_then(|value| parse_iso_date(value).ok());
        let switcher = match preselected {
            Some(date) => Switcher::preselected(date),
            None => Switcher::normal(&delivery.switcher),
        };

        let options = DatePickerOptions::from_settings(&settings.calendar, availability.clone());
        let mut picker = DatePicker::new(options, None, today);
        picker.set_selected_date(preselected);
        if let Some(date) = preselected {
            picker.show_month_of(date);
        }

        let mut orchestrator = Self {
            tz,
            today_override,
            today,
            availability,
            pickup_only_dates: parse_date_list(&delivery.pickup_only_dates).into_iter().collect(),
            delivery_only: delivery.delivery_only,
            switcher_settings: delivery.switcher.clone(),
            switcher,
            picker,
            timer: CountdownTimer::new(settings.timer.messages.clone(), scheduler),
            fee,
            cutoff: CutoffState::from_millis(delivery.cutoff_timestamp, delivery.today_delivery_available),
            preselected,
            chosen: preselected,
            notice: None,
            messages: settings.order.messages.clone(),
            min_available: today,
            pickup: PickupState::default(),
        };
        orchestrator.update(now);
        orchestrator.restart_timer(now);
        orchestrator
    }

    pub fn vendor_timezone(&self) -> Tz {
        self.tz
    }

    pub fn today(&self) -> CalendarDate {
        self.today
    }

    pub fn chosen_date(&self) -> Option<CalendarDate> {
        self.chosen
    }

    /// Date chosen on an earlier page, if any.
    pub fn preselected_date(&self) -> Option<CalendarDate> {
        self.preselected
    }

    /// Value of the delivery date field.
    pub fn delivery_field(&self) -> Option<String> {
        self.chosen.map(|date| format_date(DELIVERY_FIELD_FORMAT, date))
    }

    pub fn min_available_date(&self) -> CalendarDate {
        self.min_available
    }

    pub fn cutoff(&self) -> CutoffState {
        self.cutoff
    }

    pub fn switcher(&self) -> &Switcher {
        &self.switcher
    }

    pub fn picker(&self) -> &DatePicker {
        &self.picker
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn fee(&self) -> Option<&FeeWidget> {
        self.fee.as_ref()
    }

    /// The "delivery not available" notice, if shown.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn pickup(&self) -> PickupState {
        self.pickup
    }

    pub fn has_pickup_only_dates(&self) -> bool {
        !self.pickup_only_dates.is_empty()
    }

    pub fn can_deliver_today(&self, now: DateTime<Utc>) -> bool {
        self.cutoff
            .permits_same_day(self.today, self.tz, &self.availability, now)
    }

    pub fn is_chosen_today(&self) -> bool {
        self.chosen == Some(self.today)
    }

    /// Recomputes the quick-picks, same-day gating and calendar bounds.
    pub fn update(&mut self, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let mut events = Vec::new();
        self.today = self.today_override.unwrap_or_else(|| vendor_today(now, self.tz));
        self.picker.set_today(self.today);

        if self.switcher.is_preselected() {
            self.switcher.set_calendar_text(CalendarButtonText::PreselectedDate);
        } else {
            self.switcher.populate(
                self.today,
                &self.availability,
                self.switcher_settings.max_search_iteration,
            );
            self.switcher.set_calendar_text(CalendarButtonText::Init);
        }

        if self.can_deliver_today(now) {
            self.switcher.enable_today();
            self.min_available = self.today;
        } else {
            events.extend(self.disable_today_delivery(now));
        }

        let max_date = self.today.checked_add_months(Months::new(12));
        self.picker.set_availability(
            self.availability
                .clone()
                .with_min_date(Some(self.min_available))
                .with_max_date(max_date),
        );

        if let Some(date) = self.chosen {
            events.extend(self.sync_selection(date, now));
        }
        events
    }

    fn disable_today_delivery(&mut self, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let mut events = Vec::new();
        let today_was_active = self.switcher.disable_today(self.today);
        if self.is_chosen_today() {
            events.extend(self.reject_today(now));
            self.switcher.set_calendar_text(CalendarButtonText::Init);
        }

        if today_was_active {
            log::info!("Same-day cutoff passed while today was selected");
            events.push(DeliveryEvent::CutoffPassed {
                message: self.messages.same_day_cutoff_passed.clone(),
            });
        }
        self.min_available = self.today.succ_opt().unwrap_or(self.today);
        events
    }

    fn delivery_not_available_message(&self) -> String {
        let zip = self.fee.as_ref().and_then(FeeWidget::zip).unwrap_or_default();
        fill_template(&self.messages.delivery_not_available, &[("zip", zip)])
    }

    /// Shows the notice and drops a same-day choice that can't be met.
    fn reject_today(&mut self, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let message = self.delivery_not_available_message();
        self.notice = Some(message.clone());
        let mut events = vec![DeliveryEvent::DeliveryUnavailable { message }];
        if self.chosen.is_some() {
            events.extend(self.set_delivery_date(None, now));
        }
        events
    }

    /// Whether `date` is today while same-day delivery is closed. Clears
    /// the notice otherwise.
    fn is_disabled_today(&mut self, date: CalendarDate, now: DateTime<Utc>) -> bool {
        if date == self.today && !self.can_deliver_today(now) {
            return true;
        }
        self.notice = None;
        false
    }

    /// Mirrors a chosen date onto the quick-pick row.
    fn sync_selection(&mut self, date: CalendarDate, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        if self.is_disabled_today(date, now) {
            return self.reject_today(now);
        }

        if self.switcher.is_preselected() {
            self.switcher.show_preselected(date);
        } else if self.switcher.select(date) {
            self.switcher.set_calendar_text(CalendarButtonText::Init);
        } else {
            self.switcher.set_calendar_text(CalendarButtonText::Date(date));
            self.switcher.activate_calendar();
        }

        self.set_delivery_date(Some(date), now)
    }

    /// Handles a date picked in the calendar.
    pub fn on_calendar_date_selected(&mut self, date: CalendarDate, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        self.sync_selection(date, now)
    }

    /// Handles a click on the quick-pick button at `index`.
    pub fn click_switch_button(&mut self, index: usize, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let Some(button) = self.switcher.button(index).cloned() else {
            return Vec::new();
        };

        if button.kind == ButtonKind::Calendar {
            let opened = self.picker.open();
            return self.forward_calendar_events(opened, now);
        }

        let Some(date) = button.date else {
            return Vec::new();
        };
        if self.is_disabled_today(date, now) {
            return self.reject_today(now);
        }
        if button.disabled {
            return Vec::new();
        }

        self.switcher.set_calendar_text(if self.switcher.is_preselected() {
            CalendarButtonText::PreselectedDate
        } else {
            CalendarButtonText::Init
        });
        self.switcher.select(date);
        self.set_delivery_date(Some(date), now)
    }

    /// Writes the delivery field and refreshes the fee when it changed.
    pub fn set_delivery_date(&mut self, date: Option<CalendarDate>, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let changed = self.chosen != date;
        self.chosen = date;
        self.picker.set_selected_date(date);
        self.apply_pickup_rules();
        if date.is_none() {
            self.switcher.deselect_all();
        }

        let mut events = vec![DeliveryEvent::DateChanged(date)];
        if changed && date.is_some() {
            let field = self.delivery_field();
            let dispatched = self
                .fee
                .as_mut()
                .and_then(|fee| fee.refresh(field.as_deref()))
                .is_some();
            if dispatched {
                events.extend(self.poll_fee(now));
            }
        }
        events
    }

    /// Submits a zip code typed into the fee panel.
    pub fn submit_zip(&mut self, zip: &str, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let field = self.delivery_field();
        let dispatched = self
            .fee
            .as_mut()
            .and_then(|fee| fee.submit_zip(zip, field.as_deref()))
            .is_some();
        if dispatched {
            self.poll_fee(now)
        } else {
            Vec::new()
        }
    }

    /// Applies fee lookups that have finished since the last call.
    pub fn poll_fee(&mut self, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let updates = match self.fee.as_mut() {
            Some(fee) => fee.drain(),
            None => return Vec::new(),
        };
        self.apply_fee_updates(updates, now)
    }

    /// Blocks for a pending background lookup, then applies it.
    pub fn wait_for_fee(&mut self, timeout: std::time::Duration, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let updates = match self.fee.as_mut() {
            Some(fee) => fee.wait(timeout),
            None => return Vec::new(),
        };
        self.apply_fee_updates(updates, now)
    }

    fn apply_fee_updates(&mut self, updates: Vec<FeeUpdate>, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let mut events = Vec::new();
        for update in updates {
            events.extend(self.apply_fee_update(&update, now));
        }
        events
    }

    /// Takes the same-day window from a fee response.
    pub fn apply_fee_update(&mut self, update: &FeeUpdate, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        self.cutoff = CutoffState::from(update);
        let mut events = self.update(now);
        events.extend(self.restart_timer(now));
        events
    }

    /// Starts the countdown for the current cutoff, closing same-day
    /// delivery at once if the timer finds it already expired.
    fn restart_timer(&mut self, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let (true, Some(cutoff)) = (self.cutoff.same_day_available, self.cutoff.cutoff) else {
            self.timer.stop();
            return Vec::new();
        };

        let permitted = self.can_deliver_today(now);
        match self.timer.start(cutoff, now, permitted) {
            TimerTick::Expired => self.on_cutoff_expired(now),
            _ => Vec::new(),
        }
    }

    /// Advances the countdown; at the cutoff same-day delivery closes.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        match self.timer.tick(now) {
            TimerTick::Expired => self.on_cutoff_expired(now),
            _ => Vec::new(),
        }
    }

    /// Same as [`tick`](Self::tick) for ticks posted by a scheduler thread.
    pub fn on_tick(&mut self, tick: Tick, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        match self.timer.on_tick(tick, now) {
            TimerTick::Expired => self.on_cutoff_expired(now),
            _ => Vec::new(),
        }
    }

    fn on_cutoff_expired(&mut self, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        log::info!("Same-day cutoff expired for {}", self.today);
        let mut events = self.update(now);
        let (_, rendered) = self.render_calendar(now);
        events.extend(rendered);
        events
    }

    /// Renders the picker's month and handles a cleared same-day choice.
    pub fn render_calendar(&mut self, now: DateTime<Utc>) -> (CalendarGrid, Vec<DeliveryEvent>) {
        let (grid, calendar_events) = self.picker.render();
        let events = self.forward_calendar_events(calendar_events, now);
        (grid, events)
    }

    /// Points the calendar at the month containing `date`.
    pub fn show_calendar_month(&mut self, date: CalendarDate) {
        self.picker.show_month_of(date);
    }

    pub fn calendar_click(&mut self, target: ClickTarget, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let calendar_events = self.picker.handle_click(target);
        self.forward_calendar_events(calendar_events, now)
    }

    pub fn calendar_key(
        &mut self,
        key: Key,
        target: FocusTarget,
        now: DateTime<Utc>,
    ) -> (KeyOutcome, Vec<DeliveryEvent>) {
        let mut outcome = self.picker.handle_key(key, target);
        let calendar_events = std::mem::take(&mut outcome.events);
        let events = self.forward_calendar_events(calendar_events, now);
        (outcome, events)
    }

    fn forward_calendar_events(&mut self, calendar_events: Vec<CalendarEvent>, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        let mut events = Vec::new();
        for event in calendar_events {
            match event {
                CalendarEvent::DateSelected { date, .. } => {
                    events.extend(self.on_calendar_date_selected(date, now));
                }
                CalendarEvent::DeliveryUnavailable => events.extend(self.reject_today(now)),
                CalendarEvent::Opened => events.push(DeliveryEvent::CalendarOpened),
                CalendarEvent::Closed => events.push(DeliveryEvent::CalendarClosed),
            }
        }
        events
    }

    fn apply_pickup_rules(&mut self) {
        if self.has_pickup_only_dates() {
            self.pickup = apply_pickup_rules(self.chosen, &self.pickup_only_dates, self.delivery_only);
        }
    }

    /// Stops the countdown and detaches the picker.
    pub fn destroy(&mut self) {
        self.timer.stop();
        self.picker.destroy();
    }
}
