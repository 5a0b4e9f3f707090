// Calendar model
// View state and the rendered day grid of the date picker

use crate::utils::date::{normalize_month, CalendarDate};

/// The (year, zero-based month) pair shown by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthView {
    pub year: i32,
    /// 0 = January .. 11 = December
    pub month: i32,
}

impl MonthView {
    pub fn new(year: i32, month: i32) -> Self {
        let (year, month) = normalize_month(year, month);
        Self { year, month }
    }

    pub fn containing(date: CalendarDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month0() as i32,
        }
    }

    /// Shifts the view by `delta` months, rolling the year at the edges.
    pub fn shifted(self, delta: i32) -> Self {
        Self::new(self.year, self.month + delta)
    }
}

/// Selection owned by a single picker instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: Option<CalendarDate>,
    pub view: MonthView,
}

impl SelectionState {
    /// Starts from an existing field value when it parses, else from today.
    pub fn initial(existing: Option<CalendarDate>, today: CalendarDate) -> Self {
        match existing {
            Some(date) => Self {
                selected: Some(date),
                view: MonthView::containing(date),
            },
            None => Self {
                selected: None,
                view: MonthView::containing(today),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerState {
    #[default]
    Closed,
    Open,
}

/// One day cell of the rendered grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub date: CalendarDate,
    pub today: bool,
    pub selected: bool,
    pub disabled: bool,
    /// `0` for the single keyboard entry point, `-1` otherwise.
    pub tab_index: i8,
    pub aria_label: String,
}

impl DayCell {
    /// Space separated class list, e.g. `" today selected"`.
    pub fn class_list(&self) -> String {
        let mut classes = String::new();
        if self.today {
            classes.push_str(" today");
        }
        if self.selected {
            classes.push_str(" selected");
        }
        if self.disabled {
            classes.push_str(" disabled");
        }
        classes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell {
    /// Blank cells spanning the offset before day 1.
    Spacer { span: u32 },
    Day(DayCell),
}

/// How the month navigation buttons are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavControls {
    /// Arrow icon buttons without text.
    Arrows,
    /// "Prev" and "Next" text buttons.
    #[default]
    Text,
}

impl NavControls {
    pub fn from_use_arrows(use_arrows: bool) -> Self {
        if use_arrows {
            Self::Arrows
        } else {
            Self::Text
        }
    }

    pub fn prev_text(&self) -> &'static str {
        match self {
            Self::Arrows => "",
            Self::Text => "Prev",
        }
    }

    pub fn next_text(&self) -> &'static str {
        match self {
            Self::Arrows => "",
            Self::Text => "Next",
        }
    }

    /// Class list of the previous-month button.
    pub fn prev_class_list(&self) -> &'static str {
        match self {
            Self::Arrows => "fa fa-arrow-left datepickr-prev-month",
            Self::Text => "datepickr-prev-month",
        }
    }

    pub fn next_class_list(&self) -> &'static str {
        match self {
            Self::Arrows => "fa fa-arrow-right datepickr-next-month",
            Self::Text => "datepickr-next-month",
        }
    }
}

/// A rendered month: header, weekday labels and week rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub view: MonthView,
    pub title: String,
    pub weekday_labels: Vec<&'static str>,
    pub nav_controls: NavControls,
    pub prev_month_label: String,
    pub next_month_label: String,
    pub rows: Vec<Vec<GridCell>>,
}

impl CalendarGrid {
    pub fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.rows.iter().flatten().filter_map(|cell| match cell {
            GridCell::Day(day) => Some(day),
            GridCell::Spacer { .. } => None,
        })
    }

    pub fn day(&self, day: u32) -> Option<&DayCell> {
        self.days().find(|cell| cell.day == day)
    }

    /// The day currently holding `tab_index == 0`, if any.
    pub fn focus_day(&self) -> Option<u32> {
        self.days().find(|cell| cell.tab_index == 0).map(|cell| cell.day)
    }

    pub fn last_day(&self) -> Option<u32> {
        self.days().last().map(|cell| cell.day)
    }
}

/// An element of the picker that can hold keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The field that opens the picker.
    Trigger,
    Day(u32),
    PrevMonth,
    NextMonth,
}

/// Where a click landed relative to the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Trigger,
    Day(u32),
    PrevMonth,
    NextMonth,
    /// Anywhere else inside the picker wrapper.
    Inside,
    /// Anywhere outside the picker wrapper.
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Enter,
    Tab,
    Other,
}

/// Signals the picker emits to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEvent {
    DateSelected {
        date: CalendarDate,
        value: String,
        alt_value: String,
    },
    /// The selection sat on a disabled "today" and was cleared.
    DeliveryUnavailable,
    Opened,
    Closed,
}

/// Result of a key press on a focusable element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    pub focus: Option<FocusTarget>,
    pub prevent_default: bool,
    pub events: Vec<CalendarEvent>,
}
