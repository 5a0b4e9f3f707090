// Delivery Calendar
// Command line driver for the order widgets

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;

use delivery_calendar::models::calendar::{CalendarGrid, GridCell, NavControls};
use delivery_calendar::models::settings::WidgetSettings;
use delivery_calendar::services::delivery::DeliveryEvent;
use delivery_calendar::services::fee::{FeeWidget, HttpFeeLookup, LookupMode};
use delivery_calendar::services::order::OrderWidget;
use delivery_calendar::services::settings::SettingsService;
use delivery_calendar::services::timer::{ManualScheduler, ThreadScheduler, TickScheduler};

#[derive(Parser, Debug)]
#[command(
    name = "delivery-calendar",
    about = "Shows delivery quick-picks, the month calendar and the same-day countdown"
)]
struct Args {
    /// Settings file; defaults to settings.toml in the user config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Zip code to look up the delivery fee for
    #[arg(long)]
    zip: Option<String>,

    /// Month to show, as YYYY-MM
    #[arg(long)]
    month: Option<String>,

    /// Keep running the countdown until the cutoff passes
    #[arg(long)]
    watch: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let service = match &args.config {
        Some(path) => SettingsService::new(path),
        None => SettingsService::from_default_location()?,
    };
    let settings = service.load()?;
    log::info!("Starting delivery calendar with {}", service.path().display());

    let fee = build_fee_widget(&settings)?;
    let (tick_tx, tick_rx) = mpsc::channel();
    let scheduler: Box<dyn TickScheduler> = if args.watch {
        Box::new(ThreadScheduler::new(tick_tx))
    } else {
        Box::new(ManualScheduler::new())
    };

    let now = Utc::now();
    let mut widget = OrderWidget::from_settings(&settings, fee, scheduler, now);

    if let Some(zip) = &args.zip {
        let timeout = Duration::from_secs(settings.fee.timeout_secs + 1);
        let mut events = widget.submit_zip(zip, now);
        events.extend(widget.with_delivery(|delivery| delivery.wait_for_fee(timeout, now)));
        print_events(&events);
    }

    if let Some(month) = &args.month {
        let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
            .with_context(|| format!("invalid month '{}', expected YYYY-MM", month))?;
        widget.with_delivery(|delivery| {
            delivery.show_calendar_month(first);
            Vec::new()
        });
    }

    print_summary(&mut widget);

    if args.watch {
        while widget
            .delivery()
            .is_some_and(|delivery| delivery.timer().is_running())
        {
            let Ok(tick) = tick_rx.recv() else {
                break;
            };
            let events = widget.on_tick(tick, Utc::now());
            if let Some(text) = widget.delivery().and_then(|delivery| delivery.timer().text()) {
                println!("{}", text);
            }
            print_events(&events);
        }
    }

    Ok(())
}

fn build_fee_widget(settings: &WidgetSettings) -> Result<Option<FeeWidget>> {
    if settings.fee.url.is_none() {
        return Ok(None);
    }
    let lookup = HttpFeeLookup::from_settings(&settings.fee)?;
    Ok(Some(FeeWidget::new(
        Arc::new(lookup),
        settings.fee.messages.clone(),
        LookupMode::Background,
    )))
}

fn print_summary(widget: &mut OrderWidget) {
    let now = Utc::now();
    let grid = widget.render_calendar(now);

    if let Some(delivery) = widget.delivery() {
        println!("Today: {} ({})", delivery.today(), delivery.vendor_timezone());
        let row: Vec<String> = delivery
            .switcher()
            .buttons()
            .iter()
            .map(|button| {
                let mut label = format!("[{}]", button.label());
                if button.active {
                    label.push('*');
                }
                if button.disabled {
                    label.push_str("(x)");
                }
                label
            })
            .collect();
        println!("{}", row.join(" "));

        if let Some(fee) = delivery.fee() {
            println!("{}", fee.message());
        }
        if let Some(notice) = delivery.notice() {
            println!("{}", notice);
        }
        if let Some(text) = delivery.timer().text() {
            println!("{}", text);
        }
    }

    if let Some(pricing) = widget.pricing() {
        println!("Price: {}", pricing.price_label());
    }

    if let Some(grid) = grid {
        println!();
        print_grid(&grid);
    }
}

fn print_grid(grid: &CalendarGrid) {
    let (prev, next) = match grid.nav_controls {
        NavControls::Arrows => ("<", ">"),
        NavControls::Text => (grid.nav_controls.prev_text(), grid.nav_controls.next_text()),
    };
    println!("{:<4}{:^20}{:>4}", prev, grid.title, next);
    let header: Vec<String> = grid.weekday_labels.iter().map(|label| format!("{:>3} ", label)).collect();
    println!("{}", header.concat());

    for row in &grid.rows {
        let mut line = String::new();
        for cell in row {
            match cell {
                GridCell::Spacer { span } => line.push_str(&" ".repeat(*span as usize * 4)),
                GridCell::Day(day) => {
                    let marker = if day.selected {
                        '*'
                    } else if day.disabled {
                        '-'
                    } else {
                        ' '
                    };
                    line.push_str(&format!("{:>3}{}", day.day, marker));
                }
            }
        }
        println!("{}", line.trim_end());
    }
}

fn print_events(events: &[DeliveryEvent]) {
    for event in events {
        match event {
            DeliveryEvent::DeliveryUnavailable { message } | DeliveryEvent::CutoffPassed { message } => {
                println!("{}", message)
            }
            other => log::debug!("{:?}", other),
        }
    }
}
