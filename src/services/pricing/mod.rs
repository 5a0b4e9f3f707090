//! Product option switcher with date-dependent price changes.

use crate::models::settings::{PricingChange, PricingChangeAction, PricingChangeKind, PricingSettings};
use crate::utils::date::{parse_iso_date, CalendarDate};
use crate::utils::message::format_price;

/// A price change with its date range parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedPriceChange {
    pub from: CalendarDate,
    pub to: CalendarDate,
    pub price: f64,
    pub kind: PricingChangeKind,
    pub action: PricingChangeAction,
    pub surge: bool,
}

impl DatedPriceChange {
    fn parse(change: &PricingChange) -> Option<Self> {
        let parsed = parse_iso_date(&change.from_date).and_then(|from| {
            parse_iso_date(&change.to_date).map(|to| (from, to))
        });
        match parsed {
            Ok((from, to)) => Some(Self {
                from,
                to,
                price: change.price,
                kind: change.kind,
                action: change.action,
                surge: change.surge_flag,
            }),
            Err(err) => {
                log::warn!("Ignoring pricing change: {}", err);
                None
            }
        }
    }

    pub fn covers(&self, date: CalendarDate) -> bool {
        self.price != 0.0 && self.from <= date && date <= self.to
    }

    /// Applies the change to `price`. Percent changes round up.
    pub fn apply(&self, price: f64) -> f64 {
        let value = match self.kind {
            PricingChangeKind::Percent => price * self.price / 100.0,
            PricingChangeKind::Fixed => self.price,
        };
        let changed = match self.action {
            PricingChangeAction::Dec => price - value,
            PricingChangeAction::Inc => price + value,
        };
        match self.kind {
            PricingChangeKind::Percent => changed.ceil(),
            PricingChangeKind::Fixed => changed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceOption {
    pub price: f64,
    pub upgrade: String,
    pub description: String,
    /// Displayed price after changes, e.g. `$55.00`.
    pub label: String,
    pub active: bool,
    /// Set when the label changed on the last recalculation.
    pub changed: bool,
}

pub struct PricingSwitcher {
    base_price: f64,
    changes: Vec<DatedPriceChange>,
    options: Vec<PriceOption>,
    price_label: String,
    price_changed: bool,
    current_price: f64,
}

impl PricingSwitcher {
    /// Builds the switcher and activates the first option.
    pub fn new(settings: &PricingSettings) -> Self {
        let options = settings
            .options
            .iter()
            .map(|option| PriceOption {
                price: option.price,
                upgrade: option.upgrade.clone(),
                description: option.description.clone(),
                label: format_price(option.price, 2, true),
                active: false,
                changed: false,
            })
            .collect();

        let mut switcher = Self {
            base_price: settings.base_price,
            changes: settings.changes.iter().filter_map(DatedPriceChange::parse).collect(),
            options,
            price_label: format_price(settings.base_price, 2, true),
            price_changed: false,
            current_price: settings.base_price,
        };
        if !switcher.options.is_empty() {
            switcher.click_option(0, None);
        }
        switcher
    }

    /// A single option needs no switcher.
    pub fn is_visible(&self) -> bool {
        self.options.len() > 1
    }

    pub fn options(&self) -> &[PriceOption] {
        &self.options
    }

    pub fn active_option(&self) -> Option<&PriceOption> {
        self.options.iter().find(|option| option.active)
    }

    /// Main price label, e.g. `$55.00`.
    pub fn price_label(&self) -> &str {
        &self.price_label
    }

    pub fn price_changed(&self) -> bool {
        self.price_changed
    }

    /// Price written to the modification field.
    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Makes option `index` active and reprices for `date`.
    pub fn click_option(&mut self, index: usize, date: Option<CalendarDate>) {
        if index >= self.options.len() {
            return;
        }
        for (position, option) in self.options.iter_mut().enumerate() {
            option.active = position == index;
        }
        self.calculate_pricing(date);
    }

    pub fn on_delivery_date_changed(&mut self, date: Option<CalendarDate>) {
        self.calculate_pricing(date);
    }

    /// The change in effect on `date`, falling back to the first surge
    /// change when no date is chosen.
    pub fn pricing_change_for(&self, date: Option<CalendarDate>) -> Option<&DatedPriceChange> {
        let date = date.or_else(|| self.changes.iter().find(|change| change.surge).map(|change| change.from))?;
        self.changes.iter().find(|change| change.covers(date))
    }

    pub fn calculate_pricing(&mut self, date: Option<CalendarDate>) {
        let change = self.pricing_change_for(date).cloned();
        let apply = |price: f64| match &change {
            Some(change) => change.apply(price),
            None => price,
        };

        for option in &mut self.options {
            option.changed = false;
            if option.price == 0.0 {
                continue;
            }
            let label = format_price(apply(option.price), 2, true);
            if option.label != label {
                option.label = label;
                option.changed = true;
            }
        }

        let price = self.active_option().map_or(self.base_price, |option| option.price);
        let new_price = apply(price);
        let label = format_price(new_price, 2, true);
        self.price_changed = self.price_label != label;
        if self.price_changed {
            log::debug!("Price changed to {}", label);
            self.price_label = label;
            self.current_price = new_price;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::PricingOption;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(month: u32, day: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn option(price: f64, upgrade: &str) -> PricingOption {
        PricingOption {
            price,
            upgrade: upgrade.to_string(),
            description: format!("{} arrangement", upgrade),
        }
    }

    fn change(price: f64, kind: PricingChangeKind, action: PricingChangeAction, surge: bool) -> PricingChange {
        PricingChange {
            from_date: "2024-02-10".to_string(),
            to_date: "2024-02-14".to_string(),
            price,
            kind,
            action,
            surge_flag: surge,
        }
    }

    fn settings(changes: Vec<PricingChange>) -> PricingSettings {
        PricingSettings {
            base_price: 45.0,
            options: vec![option(45.0, "standard"), option(65.0, "deluxe")],
            changes,
        }
    }

    #[test]
    fn test_first_option_active_on_start() {
        let switcher = PricingSwitcher::new(&settings(Vec::new()));
        assert!(switcher.is_visible());
        assert_eq!(switcher.active_option().unwrap().upgrade, "standard");
        assert_eq!(switcher.price_label(), "$45.00");
    }

    #[test]
    fn test_single_option_hides_switcher() {
        let mut single = settings(Vec::new());
        single.options.truncate(1);
        assert!(!PricingSwitcher::new(&single).is_visible());
    }

    #[test]
    fn test_fixed_increase_inside_range() {
        let mut switcher = PricingSwitcher::new(&settings(vec![change(
            10.0,
            PricingChangeKind::Fixed,
            PricingChangeAction::Inc,
            false,
        )]));

        switcher.on_delivery_date_changed(Some(date(2, 12)));
        assert_eq!(switcher.price_label(), "$55.00");
        assert!(switcher.price_changed());
        assert_eq!(switcher.options()[1].label, "$75.00");
        assert!(switcher.options()[1].changed);

        switcher.on_delivery_date_changed(Some(date(2, 15)));
        assert_eq!(switcher.price_label(), "$45.00");
        assert_eq!(switcher.current_price(), 45.0);
    }

    #[test]
    fn test_percent_change_rounds_up() {
        let mut switcher = PricingSwitcher::new(&settings(vec![change(
            15.0,
            PricingChangeKind::Percent,
            PricingChangeAction::Inc,
            false,
        )]));
        switcher.click_option(1, Some(date(2, 14)));

        // 65 * 1.15 = 74.75
        assert_eq!(switcher.price_label(), "$75.00");
        assert_eq!(switcher.active_option().unwrap().upgrade, "deluxe");
    }

    #[test]
    fn test_decrease() {
        let change = DatedPriceChange {
            from: date(2, 10),
            to: date(2, 14),
            price: 10.0,
            kind: PricingChangeKind::Percent,
            action: PricingChangeAction::Dec,
            surge: false,
        };
        assert_eq!(change.apply(45.0), 41.0);
    }

    #[test]
    fn test_surge_change_applies_without_date() {
        let switcher = PricingSwitcher::new(&settings(vec![change(
            5.0,
            PricingChangeKind::Fixed,
            PricingChangeAction::Inc,
            true,
        )]));
        assert_eq!(switcher.price_label(), "$50.00");
    }

    #[test]
    fn test_zero_price_change_is_ignored() {
        let switcher = PricingSwitcher::new(&settings(vec![change(
            0.0,
            PricingChangeKind::Fixed,
            PricingChangeAction::Inc,
            true,
        )]));
        assert_eq!(switcher.pricing_change_for(Some(date(2, 12))), None);
    }

    #[test]
    fn test_malformed_change_dates_are_skipped() {
        let mut broken = change(5.0, PricingChangeKind::Fixed, PricingChangeAction::Inc, true);
        broken.to_date = "soon".to_string();
        let switcher = PricingSwitcher::new(&settings(vec![broken]));
        assert_eq!(switcher.price_label(), "$45.00");
    }
}
