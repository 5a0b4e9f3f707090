//! Month grid rendering for the date picker.

use chrono::Datelike;

use crate::models::calendar::{CalendarEvent, CalendarGrid, DayCell, GridCell, MonthView, NavControls};
use crate::utils::date::{
    date_in_view, days_in_month, full_date_string, month_name, weekday_from_sunday_index,
    weekday_name, NameStyle,
};

use super::DatePicker;

impl DatePicker {
    /// Renders the viewed month.
    ///
    /// If the selection sits on today and today is disabled, the selection
    /// is cleared and `DeliveryUnavailable` is returned alongside the grid.
    pub fn render(&mut self) -> (CalendarGrid, Vec<CalendarEvent>) {
        // A tab stop on a day that became disabled returns to the first enabled day
        let view = self.selection.view;
        let stale_focus = self
            .focused_day
            .and_then(|day| date_in_view(view.year, view.month, day))
            .is_some_and(|date| self.is_day_disabled(date));
        if stale_focus {
            self.focused_day = None;
        }

        let (mut grid, conflict) = self.build_grid();
        if !conflict {
            return (grid, Vec::new());
        }

        log::info!("Selected date {:?} is today and no longer available", self.selection.selected);
        self.selection.selected = None;
        for row in &mut grid.rows {
            for cell in row.iter_mut() {
                if let GridCell::Day(day) = cell {
                    day.selected = false;
                }
            }
        }
        (grid, vec![CalendarEvent::DeliveryUnavailable])
    }

    /// Builds the grid without touching the selection. The flag reports a
    /// today/selected/disabled conflict.
    pub fn build_grid(&self) -> (CalendarGrid, bool) {
        let view = self.selection.view;
        let first_day_of_week = self.options.first_day_of_week % 7;

        let mut offset = match date_in_view(view.year, view.month, 1) {
            Some(first) => first.weekday().num_days_from_sunday() as i32,
            None => 0,
        };
        offset -= first_day_of_week as i32;
        if offset < 0 {
            offset += 7;
        }

        let mut cells: Vec<DayCell> = Vec::new();
        let mut conflict = false;
        let mut focus_assigned = false;
        let roving = self
            .focused_day
            .filter(|day| *day <= days_in_month(view.year, view.month));

        for day in 1..=days_in_month(view.year, view.month) {
            let Some(date) = date_in_view(view.year, view.month, day) else {
                continue;
            };
            let today = date == self.today;
            let disabled = self.is_day_disabled(date);
            let selected = self.selection.selected == Some(date);
            if selected && today && disabled {
                conflict = true;
            }

            let full_date = full_date_string(date);
            let aria_label = if disabled {
                format!("{} is not available for delivery.", full_date)
            } else {
                format!("Choose {} for your delivery date. It's available.", full_date)
            };

            let takes_focus = match roving {
                Some(focused) => focused == day,
                None => !focus_assigned && !disabled,
            };
            if takes_focus {
                focus_assigned = true;
            }

            cells.push(DayCell {
                day,
                date,
                today,
                selected,
                disabled,
                tab_index: if takes_focus { 0 } else { -1 },
                aria_label,
            });
        }

        let mut rows: Vec<Vec<GridCell>> = Vec::new();
        let mut row: Vec<GridCell> = Vec::new();
        if offset > 0 {
            row.push(GridCell::Spacer { span: offset as u32 });
        }
        let mut column = offset;
        for cell in cells {
            if column == 7 {
                rows.push(std::mem::take(&mut row));
                column = 0;
            }
            row.push(GridCell::Day(cell));
            column += 1;
        }
        rows.push(row);

        let grid = CalendarGrid {
            view,
            title: self.month_title(view),
            weekday_labels: self.weekday_labels(),
            nav_controls: NavControls::from_use_arrows(self.options.use_arrows),
            prev_month_label: format!("Move backwards to {}", long_month_title(view.shifted(-1))),
            next_month_label: format!("Move forward to {}", long_month_title(view.shifted(1))),
            rows,
        };
        (grid, conflict)
    }

    fn month_title(&self, view: MonthView) -> String {
        let style = if self.options.shorthand_current_month {
            NameStyle::Short
        } else {
            NameStyle::Long
        };
        format!("{} {}", month_name(view.month as u32, style), view.year)
    }

    /// Weekday header labels starting at the configured first day.
    fn weekday_labels(&self) -> Vec<&'static str> {
        let style = if self.options.minimal_weekday_label {
            NameStyle::Minimal
        } else {
            NameStyle::Short
        };
        (0..7)
            .map(|index| weekday_name(weekday_from_sunday_index(self.options.first_day_of_week + index), style))
            .collect()
    }
}

fn long_month_title(view: MonthView) -> String {
    format!("{} {}", month_name(view.month as u32, NameStyle::Long), view.year)
}
