//! Repeating, cancellable tick sources for the countdown.
//!
//! A scheduler hands out a `TickHandle` per repeating schedule. Dropping
//! or cancelling the handle ends the schedule; ticks carry the id of the
//! schedule that produced them so stale ticks can be told apart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// One tick of a repeating schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub ticker: u64,
}

/// Ownership of a running schedule. Cancelled on drop.
#[derive(Debug)]
pub struct TickHandle {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl TickHandle {
    fn new(id: u64) -> Self {
        Self {
            id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub trait TickScheduler: Send {
    /// Starts a schedule firing every `period` until the handle is dropped.
    fn schedule_repeating(&mut self, period: Duration) -> TickHandle;
}

/// Runs each schedule on its own thread and posts ticks over a channel.
pub struct ThreadScheduler {
    sender: Sender<Tick>,
    next_id: u64,
}

impl ThreadScheduler {
    pub fn new(sender: Sender<Tick>) -> Self {
        Self { sender, next_id: 1 }
    }
}

impl TickScheduler for ThreadScheduler {
    fn schedule_repeating(&mut self, period: Duration) -> TickHandle {
        let handle = TickHandle::new(self.next_id);
        self.next_id += 1;

        let cancelled = handle.flag();
        let sender = self.sender.clone();
        let ticker = handle.id();
        thread::spawn(move || loop {
            thread::sleep(period);
            if cancelled.load(Ordering::SeqCst) {
                break;
            }
            if sender.send(Tick { ticker }).is_err() {
                break;
            }
        });

        log::debug!("Started ticker {} every {:?}", handle.id(), period);
        handle
    }
}

/// Scheduler for hosts that drive ticks from their own event loop.
///
/// It only tracks which schedules are still live; the host calls the
/// timer once per period itself.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    schedules: Arc<Mutex<Vec<(u64, Arc<AtomicBool>)>>>,
    next_id: Arc<Mutex<u64>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of schedules whose handles are still alive.
    pub fn live_tickers(&self) -> Vec<u64> {
        match self.schedules.lock() {
            Ok(schedules) => schedules
                .iter()
                .filter(|(_, cancelled)| !cancelled.load(Ordering::SeqCst))
                .map(|(id, _)| *id)
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn live_count(&self) -> usize {
        self.live_tickers().len()
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_repeating(&mut self, _period: Duration) -> TickHandle {
        let id = match self.next_id.lock() {
            Ok(mut next_id) => {
                *next_id += 1;
                *next_id
            }
            Err(_) => 0,
        };
        let handle = TickHandle::new(id);
        if let Ok(mut schedules) = self.schedules.lock() {
            schedules.retain(|(_, cancelled)| !cancelled.load(Ordering::SeqCst));
            schedules.push((id, handle.flag()));
        }
        handle
    }
}
