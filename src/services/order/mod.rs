//! Order form composition root.
//!
//! Holds the delivery orchestrator and the pricing switcher, forwards
//! delivery date changes to pricing and gates submission.

use chrono::{DateTime, Utc};

use crate::models::calendar::{CalendarGrid, ClickTarget, FocusTarget, Key, KeyOutcome};
use crate::models::settings::{OrderMessages, WidgetSettings};
use crate::services::delivery::{DeliveryEvent, DeliveryOrchestrator};
use crate::services::fee::FeeWidget;
use crate::services::pricing::PricingSwitcher;
use crate::services::timer::{Tick, TickScheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    Order,
    AddToCart,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Submission refused; the message is shown on the form.
    Blocked { message: String },
    /// A pickup-only date needs the customer's confirmation first.
    NeedsPickupConfirmation { delivery_date: Option<String> },
    Ready {
        kind: SubmitKind,
        delivery_date: Option<String>,
        /// Price of the active option, sent with the add-to-cart signal.
        price: Option<f64>,
    },
}

pub struct OrderWidget {
    status: bool,
    messages: OrderMessages,
    delivery: Option<DeliveryOrchestrator>,
    pricing: Option<PricingSwitcher>,
    pickup_confirmed: bool,
    message: Option<String>,
}

impl OrderWidget {
    pub fn new(
        status: bool,
        messages: OrderMessages,
        delivery: Option<DeliveryOrchestrator>,
        pricing: Option<PricingSwitcher>,
    ) -> Self {
        let mut widget = Self {
            status,
            messages,
            delivery,
            pricing,
            pickup_confirmed: false,
            message: None,
        };
        let chosen = widget.delivery.as_ref().and_then(DeliveryOrchestrator::chosen_date);
        if let Some(pricing) = widget.pricing.as_mut() {
            pricing.on_delivery_date_changed(chosen);
        }
        widget
    }

    /// Builds every widget the settings describe. Pricing is only present
    /// when options are configured.
    pub fn from_settings(
        settings: &WidgetSettings,
        fee: Option<FeeWidget>,
        scheduler: Box<dyn TickScheduler>,
        now: DateTime<Utc>,
    ) -> Self {
        let delivery = DeliveryOrchestrator::new(settings, fee, scheduler, now);
        let pricing = if settings.pricing.options.is_empty() {
            None
        } else {
            Some(PricingSwitcher::new(&settings.pricing))
        };
        Self::new(settings.order.status, settings.order.messages.clone(), Some(delivery), pricing)
    }

    pub fn delivery(&self) -> Option<&DeliveryOrchestrator> {
        self.delivery.as_ref()
    }

    pub fn pricing(&self) -> Option<&PricingSwitcher> {
        self.pricing.as_ref()
    }

    /// Form message from the last submission attempt.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Runs `action` against the orchestrator and forwards date changes.
    pub fn with_delivery<F>(&mut self, action: F) -> Vec<DeliveryEvent>
    where
        F: FnOnce(&mut DeliveryOrchestrator) -> Vec<DeliveryEvent>,
    {
        let events = match self.delivery.as_mut() {
            Some(delivery) => action(delivery),
            None => return Vec::new(),
        };
        self.forward(&events);
        events
    }

    fn forward(&mut self, events: &[DeliveryEvent]) {
        let Some(pricing) = self.pricing.as_mut() else {
            return;
        };
        for event in events {
            if let DeliveryEvent::DateChanged(date) = event {
                pricing.on_delivery_date_changed(*date);
            }
        }
    }

    pub fn click_switch_button(&mut self, index: usize, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        self.with_delivery(|delivery| delivery.click_switch_button(index, now))
    }

    pub fn calendar_click(&mut self, target: ClickTarget, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        self.with_delivery(|delivery| delivery.calendar_click(target, now))
    }

    pub fn calendar_key(&mut self, key: Key, target: FocusTarget, now: DateTime<Utc>) -> KeyOutcome {
        let mut outcome = KeyOutcome::default();
        self.with_delivery(|delivery| {
            let (key_outcome, events) = delivery.calendar_key(key, target, now);
            outcome = key_outcome;
            events
        });
        outcome
    }

    pub fn render_calendar(&mut self, now: DateTime<Utc>) -> Option<CalendarGrid> {
        let mut grid = None;
        self.with_delivery(|delivery| {
            let (rendered, events) = delivery.render_calendar(now);
            grid = Some(rendered);
            events
        });
        grid
    }

    pub fn submit_zip(&mut self, zip: &str, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        self.with_delivery(|delivery| delivery.submit_zip(zip, now))
    }

    pub fn poll_fee(&mut self, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        self.with_delivery(|delivery| delivery.poll_fee(now))
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        self.with_delivery(|delivery| delivery.tick(now))
    }

    pub fn on_tick(&mut self, tick: Tick, now: DateTime<Utc>) -> Vec<DeliveryEvent> {
        self.with_delivery(|delivery| delivery.on_tick(tick, now))
    }

    pub fn select_price_option(&mut self, index: usize) {
        let chosen = self.delivery.as_ref().and_then(DeliveryOrchestrator::chosen_date);
        if let Some(pricing) = self.pricing.as_mut() {
            pricing.click_option(index, chosen);
        }
    }

    /// Records that the customer accepted in-store pickup.
    pub fn confirm_pickup(&mut self) {
        self.pickup_confirmed = true;
    }

    pub fn submit(&mut self, kind: SubmitKind) -> SubmitOutcome {
        self.message = None;

        let mut blocked = None;
        if !self.status {
            blocked = Some(self.messages.not_available.clone());
        }
        if let Some(delivery) = &self.delivery {
            if delivery.chosen_date().is_none() {
                blocked = Some(self.messages.error_select_date.clone());
            }
        }
        if let Some(message) = blocked {
            self.message = Some(message.clone());
            return SubmitOutcome::Blocked { message };
        }

        let delivery_date = self.delivery.as_ref().and_then(DeliveryOrchestrator::delivery_field);
        let pickup_only = self
            .delivery
            .as_ref()
            .is_some_and(|delivery| delivery.pickup().pickup_only);
        if pickup_only && !self.pickup_confirmed {
            return SubmitOutcome::NeedsPickupConfirmation { delivery_date };
        }
        self.pickup_confirmed = false;

        let price = self
            .pricing
            .as_ref()
            .and_then(PricingSwitcher::active_option)
            .map(|option| option.price)
            .filter(|price| *price != 0.0);
        log::info!("Submitting {:?} for {:?}", kind, delivery_date);
        SubmitOutcome::Ready {
            kind,
            delivery_date,
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::PricingOption;
    use crate::services::timer::ManualScheduler;
    use chrono::{Duration, NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 12, 18, 0, 0).unwrap()
    }

    fn settings() -> WidgetSettings {
        let mut settings = WidgetSettings::default();
        settings.delivery.today_delivery_available = true;
        settings.delivery.cutoff_timestamp = Some((now() + Duration::hours(4)).timestamp_millis());
        settings.pricing.base_price = 40.0;
        settings.pricing.options = vec![
            PricingOption {
                price: 40.0,
                upgrade: "standard".to_string(),
                description: "Standard".to_string(),
            },
            PricingOption {
                price: 60.0,
                upgrade: "deluxe".to_string(),
                description: "Deluxe".to_string(),
            },
        ];
        settings.pricing.changes = vec![crate::models::settings::PricingChange {
            from_date: "2024-02-13".to_string(),
            to_date: "2024-02-14".to_string(),
            price: 10.0,
            kind: Default::default(),
            action: Default::default(),
            surge_flag: false,
        }];
        settings
    }

    fn widget(settings: &WidgetSettings) -> OrderWidget {
        OrderWidget::from_settings(settings, None, Box::new(ManualScheduler::new()), now())
    }

    #[test]
    fn test_submit_requires_date() {
        let mut widget = widget(&settings());
        assert_eq!(
            widget.submit(SubmitKind::Order),
            SubmitOutcome::Blocked {
                message: "Please select a delivery date.".to_string()
            }
        );
        assert_eq!(widget.message(), Some("Please select a delivery date."));
    }

    #[test]
    fn test_unsellable_product_is_blocked() {
        let mut settings = settings();
        settings.order.status = false;
        let mut widget = widget(&settings);
        widget.click_switch_button(0, now());

        assert_eq!(
            widget.submit(SubmitKind::AddToCart),
            SubmitOutcome::Blocked {
                message: "This is not available for sale.".to_string()
            }
        );
    }

    #[test]
    fn test_date_change_reprices() {
        let mut widget = widget(&settings());
        assert_eq!(widget.pricing().unwrap().price_label(), "$40.00");

        // Second quick-pick is February 13th
        widget.click_switch_button(1, now());
        assert_eq!(widget.pricing().unwrap().price_label(), "$50.00");

        widget.select_price_option(1);
        assert_eq!(widget.pricing().unwrap().price_label(), "$70.00");

        assert_eq!(
            widget.submit(SubmitKind::AddToCart),
            SubmitOutcome::Ready {
                kind: SubmitKind::AddToCart,
                delivery_date: Some("02/13/2024".to_string()),
                price: Some(60.0),
            }
        );
    }

    #[test]
    fn test_pickup_only_date_needs_confirmation() {
        let mut settings = settings();
        settings.delivery.pickup_only_dates = vec!["2024-02-14".to_string()];
        let mut widget = widget(&settings);

        widget.with_delivery(|delivery| {
            delivery.on_calendar_date_selected(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(), now())
        });
        assert_eq!(
            widget.submit(SubmitKind::Order),
            SubmitOutcome::NeedsPickupConfirmation {
                delivery_date: Some("02/14/2024".to_string())
            }
        );

        widget.confirm_pickup();
        assert!(matches!(widget.submit(SubmitKind::Order), SubmitOutcome::Ready { .. }));
        // Confirmation is spent by a successful submission
        assert!(matches!(
            widget.submit(SubmitKind::Order),
            SubmitOutcome::NeedsPickupConfirmation { .. }
        ));
    }

    #[test]
    fn test_without_delivery_widget_only_status_matters() {
        let mut widget = OrderWidget::new(true, OrderMessages::default(), None, None);
        assert_eq!(
            widget.submit(SubmitKind::Order),
            SubmitOutcome::Ready {
                kind: SubmitKind::Order,
                delivery_date: None,
                price: None
            }
        );
        assert!(widget.click_switch_button(0, now()).is_empty());
    }
}
