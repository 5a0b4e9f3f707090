//! Keyboard interaction for the date picker.
//!
//! Arrow keys move between days and cross month edges, Enter activates
//! (on the trigger it opens or closes the picker),
//! and Tab from a day (or from "next month" when no day can take focus)
//! cycles back to the "previous month" control.

use crate::models::calendar::{FocusTarget, Key, KeyOutcome};

use super::DatePicker;

impl DatePicker {
    /// Handles `key` pressed while `target` holds focus.
    pub fn handle_key(&mut self, key: Key, target: FocusTarget) -> KeyOutcome {
        if self.destroyed {
            return KeyOutcome::default();
        }

        let (grid, _) = self.build_grid();
        let initial_focus_day = grid.focus_day();
        let last_day = grid.last_day().unwrap_or(1);
        let is_nav = matches!(target, FocusTarget::PrevMonth | FocusTarget::NextMonth);

        let focus = match key {
            Key::ArrowRight => match target {
                _ if is_nav => initial_focus_day.map(FocusTarget::Day),
                FocusTarget::Day(day) if day >= last_day => {
                    self.transition_month(1);
                    Some(FocusTarget::Day(1))
                }
                FocusTarget::Day(day) => Some(FocusTarget::Day(day + 1)),
                _ => None,
            },
            Key::ArrowLeft => match target {
                _ if is_nav => initial_focus_day.map(FocusTarget::Day),
                FocusTarget::Day(day) if day <= 1 => {
                    self.transition_month(-1);
                    let (previous, _) = self.build_grid();
                    previous.last_day().map(FocusTarget::Day)
                }
                FocusTarget::Day(day) => Some(FocusTarget::Day(day - 1)),
                _ => None,
            },
            Key::Tab => {
                let traps = match target {
                    FocusTarget::Day(_) => true,
                    FocusTarget::NextMonth => initial_focus_day.is_none(),
                    FocusTarget::PrevMonth | FocusTarget::Trigger => false,
                };
                return if traps {
                    KeyOutcome {
                        focus: Some(FocusTarget::PrevMonth),
                        prevent_default: true,
                        events: Vec::new(),
                    }
                } else {
                    KeyOutcome::default()
                };
            }
            Key::Enter => {
                let events = match target {
                    FocusTarget::Trigger => self.toggle(),
                    FocusTarget::Day(day) => self.select_day(day),
                    FocusTarget::PrevMonth => {
                        self.transition_month(-1);
                        Vec::new()
                    }
                    FocusTarget::NextMonth => {
                        self.transition_month(1);
                        Vec::new()
                    }
                };
                return KeyOutcome {
                    focus: None,
                    prevent_default: true,
                    events,
                };
            }
            Key::Other => None,
        };

        // Moving between days carries the roving tab stop along
        if let (Some(FocusTarget::Day(day)), FocusTarget::Day(_)) = (focus, target) {
            self.focused_day = Some(day);
        }

        KeyOutcome {
            focus,
            prevent_default: false,
            events: Vec::new(),
        }
    }
}
