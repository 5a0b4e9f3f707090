//! Quick-pick button row.
//!
//! The normal layout is an optional "today" button, a fixed number of
//! default buttons holding the next available dates, and a calendar button.
//! When a date was chosen on an earlier page the row collapses to a single
//! date button plus a "Change Date" calendar button.

use crate::models::availability::AvailabilityConfig;
use crate::models::settings::SwitcherSettings;
use crate::services::availability::{is_available, next_available};
use crate::utils::date::{format_date, full_date_string, CalendarDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Today,
    Default,
    /// The preselected date.
    Date,
    Calendar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchButton {
    pub kind: ButtonKind,
    pub date: Option<CalendarDate>,
    pub top: String,
    pub bottom: String,
    pub aria_label: Option<String>,
    pub active: bool,
    pub disabled: bool,
}

impl SwitchButton {
    fn new(kind: ButtonKind) -> Self {
        Self {
            kind,
            date: None,
            top: String::new(),
            bottom: String::new(),
            aria_label: None,
            active: false,
            disabled: false,
        }
    }

    pub fn class_list(&self) -> String {
        let mut classes = String::from("switcher_option date-button");
        match self.kind {
            ButtonKind::Today => classes.push_str(" today-button"),
            ButtonKind::Calendar => classes.push_str(" calendar-button"),
            ButtonKind::Default | ButtonKind::Date => {}
        }
        if self.active {
            classes.push_str(" active");
        }
        if self.disabled {
            classes.push_str(" disabled");
        }
        classes
    }

    /// Both label rows joined by a space, for plain-text output.
    pub fn label(&self) -> String {
        format!("{} {}", self.top, self.bottom).trim().to_string()
    }

    fn show_date(&mut self, date: CalendarDate) {
        self.date = Some(date);
        self.top = match self.kind {
            ButtonKind::Today => "Today".to_string(),
            _ => format_date("D", date),
        };
        self.bottom = format_date("M j", date);
        self.aria_label = Some(available_aria_label(date));
    }

    fn clear(&mut self) {
        self.date = None;
        self.top.clear();
        self.bottom.clear();
        self.aria_label = None;
        self.active = false;
    }
}

/// Text shown on the calendar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarButtonText {
    /// "Full Calendar"
    Init,
    /// "Change Date"
    PreselectedDate,
    /// A date chosen from the calendar that no quick-pick holds.
    Date(CalendarDate),
}

pub fn available_aria_label(date: CalendarDate) -> String {
    format!("Choose {} for your delivery date. It's available", full_date_string(date))
}

pub fn unavailable_aria_label(date: CalendarDate) -> String {
    format!("{} is not available for delivery.", full_date_string(date))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switcher {
    buttons: Vec<SwitchButton>,
    preselected: bool,
}

impl Switcher {
    pub fn normal(settings: &SwitcherSettings) -> Self {
        let mut buttons = Vec::with_capacity(settings.count_default_buttons + 2);
        if settings.use_today_button {
            buttons.push(SwitchButton::new(ButtonKind::Today));
        }
        buttons.extend((0..settings.count_default_buttons).map(|_| SwitchButton::new(ButtonKind::Default)));
        buttons.push(SwitchButton::new(ButtonKind::Calendar));

        let mut switcher = Self {
            buttons,
            preselected: false,
        };
        switcher.set_calendar_text(CalendarButtonText::Init);
        switcher
    }

    pub fn preselected(date: CalendarDate) -> Self {
        let mut date_button = SwitchButton::new(ButtonKind::Date);
        date_button.show_date(date);
        date_button.active = true;

        let mut switcher = Self {
            buttons: vec![date_button, SwitchButton::new(ButtonKind::Calendar)],
            preselected: true,
        };
        switcher.set_calendar_text(CalendarButtonText::PreselectedDate);
        switcher
    }

    pub fn is_preselected(&self) -> bool {
        self.preselected
    }

    pub fn buttons(&self) -> &[SwitchButton] {
        &self.buttons
    }

    pub fn button(&self, index: usize) -> Option<&SwitchButton> {
        self.buttons.get(index)
    }

    pub fn today_button(&self) -> Option<&SwitchButton> {
        self.find(ButtonKind::Today)
    }

    pub fn calendar_button(&self) -> Option<&SwitchButton> {
        self.find(ButtonKind::Calendar)
    }

    pub fn date_button(&self) -> Option<&SwitchButton> {
        self.find(ButtonKind::Date)
    }

    fn find(&self, kind: ButtonKind) -> Option<&SwitchButton> {
        self.buttons.iter().find(|button| button.kind == kind)
    }

    fn find_mut(&mut self, kind: ButtonKind) -> Option<&mut SwitchButton> {
        self.buttons.iter_mut().find(|button| button.kind == kind)
    }

    /// Assigns dates to the today and default buttons.
    ///
    /// The today button always holds `today`; every following button holds
    /// the next available date after the previous one. Without a today
    /// button the first default button starts at `today` when it is
    /// available. Buttons past an exhausted search are left empty.
    pub fn populate(&mut self, today: CalendarDate, availability: &AvailabilityConfig, max_iterations: u32) {
        let mut previous: Option<CalendarDate> = None;
        let mut exhausted = false;

        for button in &mut self.buttons {
            if !matches!(button.kind, ButtonKind::Today | ButtonKind::Default) {
                continue;
            }

            let date = if exhausted {
                None
            } else {
                match (button.kind, previous) {
                    (ButtonKind::Today, _) => Some(today),
                    (_, None) if is_available(today, availability) => Some(today),
                    (_, None) => next_available(today, availability, max_iterations).found(),
                    (_, Some(previous)) => next_available(previous, availability, max_iterations).found(),
                }
            };

            match date {
                Some(date) => {
                    button.show_date(date);
                    button.disabled = false;
                    previous = Some(date);
                }
                None => {
                    if !exhausted {
                        log::warn!("No available date found for quick-pick after {}", today);
                    }
                    exhausted = true;
                    button.clear();
                    button.disabled = true;
                }
            }
        }
    }

    pub fn set_calendar_text(&mut self, text: CalendarButtonText) {
        if let Some(button) = self.find_mut(ButtonKind::Calendar) {
            let (top, bottom) = match text {
                CalendarButtonText::Init => ("Full".to_string(), "Calendar".to_string()),
                CalendarButtonText::PreselectedDate => ("Change".to_string(), "Date".to_string()),
                CalendarButtonText::Date(date) => (format_date("D", date), format_date("M j", date)),
            };
            button.top = top;
            button.bottom = bottom;
            button.aria_label = Some("Choose delivery date".to_string());
        }
    }

    /// Marks the button holding `date` active and every other one inactive.
    pub fn select(&mut self, date: CalendarDate) -> bool {
        let mut selected = false;
        for button in &mut self.buttons {
            button.active = button.kind != ButtonKind::Calendar && button.date == Some(date);
            selected |= button.active;
        }
        selected
    }

    pub fn deselect_all(&mut self) {
        for button in &mut self.buttons {
            button.active = false;
        }
    }

    pub fn activate_calendar(&mut self) {
        if let Some(button) = self.find_mut(ButtonKind::Calendar) {
            button.active = true;
        }
    }

    /// Moves the preselected date button to `date`.
    pub fn show_preselected(&mut self, date: CalendarDate) {
        if let Some(button) = self.find_mut(ButtonKind::Date) {
            button.show_date(date);
            button.active = true;
        }
    }

    /// Disables the today button. Returns whether it was the active one.
    pub fn disable_today(&mut self, today: CalendarDate) -> bool {
        match self.find_mut(ButtonKind::Today) {
            Some(button) => {
                let was_active = button.active;
                button.disabled = true;
                button.active = false;
                button.aria_label = Some(unavailable_aria_label(today));
                was_active
            }
            None => false,
        }
    }

    pub fn enable_today(&mut self) {
        if let Some(button) = self.find_mut(ButtonKind::Today) {
            button.disabled = false;
        }
    }
}
