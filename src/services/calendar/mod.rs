//! Date picker state machine.
//!
//! The picker is `Closed` until its trigger is activated, listens for
//! outside clicks only while `Open`, and closes again on an outside click
//! or a successful selection. Rendering lives in `grid.rs`, keyboard
//! handling in `keyboard.rs`.

mod grid;
mod keyboard;

use crate::models::availability::AvailabilityConfig;
use crate::models::calendar::{
    CalendarEvent, ClickTarget, MonthView, PickerState, SelectionState,
};
use crate::models::settings::CalendarSettings;
use crate::services::availability::is_available;
use crate::utils::date::{date_in_view, format_date, parse_form_value, CalendarDate};

/// Per-instance picker options.
#[derive(Debug, Clone, PartialEq)]
pub struct DatePickerOptions {
    pub date_format: String,
    pub alt_format: Option<String>,
    /// 0 = Sunday
    pub first_day_of_week: u32,
    pub shorthand_current_month: bool,
    pub minimal_weekday_label: bool,
    pub use_arrows: bool,
    pub availability: AvailabilityConfig,
}

impl Default for DatePickerOptions {
    fn default() -> Self {
        Self {
            date_format: "F j, Y".to_string(),
            alt_format: None,
            first_day_of_week: 0,
            shorthand_current_month: false,
            minimal_weekday_label: false,
            use_arrows: false,
            availability: AvailabilityConfig::default(),
        }
    }
}

impl DatePickerOptions {
    pub fn from_settings(settings: &CalendarSettings, availability: AvailabilityConfig) -> Self {
        Self {
            date_format: settings.date_format.clone(),
            alt_format: settings.alt_format.clone(),
            first_day_of_week: u32::from(settings.first_day_of_week % 7),
            shorthand_current_month: settings.shorthand_current_month,
            minimal_weekday_label: settings.minimal_weekday_label,
            use_arrows: settings.use_arrows,
            availability,
        }
    }
}

pub struct DatePicker {
    options: DatePickerOptions,
    state: PickerState,
    selection: SelectionState,
    today: CalendarDate,
    /// Day holding the roving tab stop after keyboard navigation.
    focused_day: Option<u32>,
    listening_outside: bool,
    destroyed: bool,
    value: String,
    alt_value: String,
}

impl DatePicker {
    /// Creates a closed picker, restoring the selection from an existing
    /// field value when it parses.
    pub fn new(options: DatePickerOptions, existing_value: Option<&str>, today: CalendarDate) -> Self {
        let existing = existing_value.and_then(parse_form_value);
        let selection = SelectionState::initial(existing, today);
        let value = existing_value
            .filter(|_| existing.is_some())
            .map(str::to_string)
            .unwrap_or_default();

        Self {
            options,
            state: PickerState::Closed,
            selection,
            today,
            focused_day: None,
            listening_outside: false,
            destroyed: false,
            alt_value: value.clone(),
            value,
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == PickerState::Open
    }

    /// Whether the outside-click listener is installed.
    pub fn is_listening_outside(&self) -> bool {
        self.listening_outside
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn selected_date(&self) -> Option<CalendarDate> {
        self.selection.selected
    }

    pub fn view(&self) -> MonthView {
        self.selection.view
    }

    pub fn today(&self) -> CalendarDate {
        self.today
    }

    /// Formatted value of the main field.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Formatted value of the alternate (hidden) field.
    pub fn alt_value(&self) -> &str {
        &self.alt_value
    }

    pub fn options(&self) -> &DatePickerOptions {
        &self.options
    }

    pub fn availability(&self) -> &AvailabilityConfig {
        &self.options.availability
    }

    /// Replaces the availability rules, e.g. when same-day delivery closes.
    pub fn set_availability(&mut self, availability: AvailabilityConfig) {
        self.options.availability = availability;
    }

    pub fn set_today(&mut self, today: CalendarDate) {
        self.today = today;
    }

    pub fn is_day_disabled(&self, date: CalendarDate) -> bool {
        !is_available(date, &self.options.availability)
    }

    pub fn open(&mut self) -> Vec<CalendarEvent> {
        if self.destroyed || self.is_open() {
            return Vec::new();
        }
        self.state = PickerState::Open;
        self.listening_outside = true;
        vec![CalendarEvent::Opened]
    }

    pub fn close(&mut self) -> Vec<CalendarEvent> {
        self.listening_outside = false;
        if !self.is_open() {
            return Vec::new();
        }
        self.state = PickerState::Closed;
        vec![CalendarEvent::Closed]
    }

    /// Enter on the trigger flips the picker open or closed.
    pub fn toggle(&mut self) -> Vec<CalendarEvent> {
        if self.is_open() {
            self.close()
        } else {
            self.open()
        }
    }

    /// Detaches every listener; the picker ignores input afterwards.
    pub fn destroy(&mut self) {
        self.close();
        self.destroyed = true;
    }

    pub fn handle_click(&mut self, target: ClickTarget) -> Vec<CalendarEvent> {
        if self.destroyed {
            return Vec::new();
        }

        match target {
            ClickTarget::Trigger => self.open(),
            ClickTarget::Outside if self.listening_outside => self.close(),
            ClickTarget::Outside | ClickTarget::Inside => Vec::new(),
            ClickTarget::PrevMonth => {
                self.transition_month(-1);
                Vec::new()
            }
            ClickTarget::NextMonth => {
                self.transition_month(1);
                Vec::new()
            }
            ClickTarget::Day(day) => self.select_day(day),
        }
    }

    /// Moves the view by `delta` months; the year rolls at the edges.
    pub fn transition_month(&mut self, delta: i32) {
        self.selection.view = self.selection.view.shifted(delta);
        self.focused_day = None;
    }

    /// Jumps the view straight to the month containing `date`.
    pub fn show_month_of(&mut self, date: CalendarDate) {
        self.selection.view = MonthView::containing(date);
        self.focused_day = None;
    }

    /// Selects `day` of the viewed month unless it is disabled.
    pub fn select_day(&mut self, day: u32) -> Vec<CalendarEvent> {
        let view = self.selection.view;
        let Some(date) = date_in_view(view.year, view.month, day) else {
            return Vec::new();
        };
        if self.is_day_disabled(date) {
            log::debug!("Ignoring click on disabled day {}", date);
            return Vec::new();
        }

        self.selection.selected = Some(date);
        self.value = format_date(&self.options.date_format, date);
        let alt_format = self
            .options
            .alt_format
            .as_deref()
            .unwrap_or(&self.options.date_format);
        self.alt_value = format_date(alt_format, date);

        let mut events = vec![CalendarEvent::DateSelected {
            date,
            value: self.value.clone(),
            alt_value: self.alt_value.clone(),
        }];
        events.extend(self.close());
        events
    }

    /// Forces the selection without availability checks, e.g. when a
    /// quick-pick button chooses a date.
    pub fn set_selected_date(&mut self, date: Option<CalendarDate>) {
        self.selection.selected = date;
        match date {
            Some(date) => {
                self.value = format_date(&self.options.date_format, date);
                let alt_format = self
                    .options
                    .alt_format
                    .as_deref()
                    .unwrap_or(&self.options.date_format);
                self.alt_value = format_date(alt_format, date);
            }
            None => {
                self.value.clear();
                self.alt_value.clear();
            }
        }
    }
}
