// Pickup-only dates
// A date in the pickup-only set either blocks ordering (delivery-only
// stores) or swaps the fee panel for the pickup panel.

use std::collections::BTreeSet;

use crate::utils::date::CalendarDate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitButton {
    #[default]
    OrderNow,
    TemporarilyUnavailable,
}

impl SubmitButton {
    pub fn label(&self) -> &'static str {
        match self {
            SubmitButton::OrderNow => "Order Now",
            SubmitButton::TemporarilyUnavailable => "Temporarily Unavailable",
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, SubmitButton::TemporarilyUnavailable)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryPanel {
    #[default]
    Fee,
    Pickup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickupState {
    pub submit: SubmitButton,
    pub panel: DeliveryPanel,
    /// Value of the hidden pickup-only field.
    pub pickup_only: bool,
}

pub fn apply_pickup_rules(
    chosen: Option<CalendarDate>,
    pickup_only_dates: &BTreeSet<CalendarDate>,
    delivery_only: bool,
) -> PickupState {
    let is_pickup_day = chosen.is_some_and(|date| pickup_only_dates.contains(&date));

    if delivery_only {
        PickupState {
            submit: if is_pickup_day {
                SubmitButton::TemporarilyUnavailable
            } else {
                SubmitButton::OrderNow
            },
            ..PickupState::default()
        }
    } else if is_pickup_day {
        PickupState {
            submit: SubmitButton::OrderNow,
            panel: DeliveryPanel::Pickup,
            pickup_only: true,
        }
    } else {
        PickupState::default()
    }
}
