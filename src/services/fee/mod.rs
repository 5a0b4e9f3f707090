//! Delivery fee lookup for a zip code and delivery date.
//!
//! Lookups run through a [`FeeLookup`] implementation either on the
//! caller's thread or on a worker thread. Both paths post their result to
//! the same channel, and [`FeeWidget::drain`] applies them on the owner's
//! turn. Every request carries a sequence number; a result older than the
//! latest dispatched request is discarded.

mod client;
mod messages;

pub use client::{parse_response, HttpFeeLookup};
pub use messages::message_for_response;

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::settings::FeeMessages;

#[derive(Debug, Error)]
pub enum FeeLookupError {
    #[error("fee request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("fee endpoint answered with HTTP status {0}")]
    Status(u16),
    #[error("malformed fee response: {0}")]
    Body(#[from] serde_json::Error),
    #[error("fee endpoint reported failure")]
    Unsuccessful,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeRequest {
    pub zip: String,
    /// Delivery date as shown in the delivery field (`MM/DD/YYYY`).
    pub delivery_date: Option<String>,
}

/// Body returned by the fee endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeResponse {
    pub success: bool,
    pub delivery: bool,
    pub fee: Option<f64>,
    pub zone_disabled: bool,
    #[serde(rename = "box")]
    pub is_box: bool,
    pub same_day_available: bool,
    /// Unix milliseconds.
    pub cutoff_timestamp: Option<i64>,
}

impl FeeResponse {
    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.cutoff_timestamp
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait FeeLookup: Send + Sync {
    fn lookup(&self, request: &FeeRequest) -> Result<FeeResponse, FeeLookupError>;
}

/// Exactly five ASCII digits.
pub fn validate_zip(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// Run the lookup on the calling thread.
    Inline,
    /// Run each lookup on its own worker thread.
    Background,
}

/// Same-day information from a successful lookup, for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeUpdate {
    pub zip: String,
    pub same_day_available: bool,
    pub cutoff: Option<DateTime<Utc>>,
}

struct FeeResult {
    seq: u64,
    zip: String,
    outcome: Result<FeeResponse, FeeLookupError>,
}

pub struct FeeWidget {
    lookup: Arc<dyn FeeLookup>,
    messages: FeeMessages,
    mode: LookupMode,
    sender: Sender<FeeResult>,
    receiver: Receiver<FeeResult>,
    next_seq: u64,
    latest_seq: Option<u64>,
    latest_resolved: bool,
    zip_input: String,
    zip: Option<String>,
    message: String,
}

impl FeeWidget {
    pub fn new(lookup: Arc<dyn FeeLookup>, messages: FeeMessages, mode: LookupMode) -> Self {
        let (sender, receiver) = mpsc::channel();
        let message = messages.initial.clone();
        Self {
            lookup,
            messages,
            mode,
            sender,
            receiver,
            next_seq: 1,
            latest_seq: None,
            latest_resolved: true,
            zip_input: String::new(),
            zip: None,
            message,
        }
    }

    /// Current panel text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Zip of the last successful lookup.
    pub fn zip(&self) -> Option<&str> {
        self.zip.as_deref()
    }

    pub fn zip_input(&self) -> &str {
        &self.zip_input
    }

    pub fn set_zip_input(&mut self, zip: &str) {
        self.zip_input = zip.trim().to_string();
    }

    /// Whether the latest request is still unanswered.
    pub fn is_pending(&self) -> bool {
        !self.latest_resolved
    }

    /// Validates the typed zip and dispatches a lookup.
    pub fn submit_zip(&mut self, zip: &str, delivery_date: Option<&str>) -> Option<u64> {
        self.set_zip_input(zip);
        if self.zip_input.is_empty() || !validate_zip(&self.zip_input) {
            log::debug!("Ignoring invalid zip '{}'", self.zip_input);
            return None;
        }
        let zip = self.zip_input.clone();
        Some(self.dispatch(zip, delivery_date))
    }

    /// Re-runs the lookup after the delivery date changed, using the typed
    /// zip or else the last successful one.
    pub fn refresh(&mut self, delivery_date: Option<&str>) -> Option<u64> {
        let zip = if self.zip_input.is_empty() {
            self.zip.clone()?
        } else {
            self.zip_input.clone()
        };
        if !validate_zip(&zip) {
            return None;
        }
        Some(self.dispatch(zip, delivery_date))
    }

    fn dispatch(&mut self, zip: String, delivery_date: Option<&str>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_seq = Some(seq);
        self.latest_resolved = false;

        let request = FeeRequest {
            zip: zip.clone(),
            delivery_date: delivery_date.map(str::to_string),
        };
        log::info!("Looking up delivery fee #{} for {}", seq, zip);

        match self.mode {
            LookupMode::Inline => {
                let outcome = self.lookup.lookup(&request);
                let _ = self.sender.send(FeeResult { seq, zip, outcome });
            }
            LookupMode::Background => {
                let lookup = Arc::clone(&self.lookup);
                let sender = self.sender.clone();
                thread::spawn(move || {
                    let outcome = lookup.lookup(&request);
                    let _ = sender.send(FeeResult { seq, zip, outcome });
                });
            }
        }
        seq
    }

    /// Applies every result that has arrived so far.
    pub fn drain(&mut self) -> Vec<FeeUpdate> {
        let mut updates = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(result) => updates.extend(self.apply(result)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        updates
    }

    /// Blocks until the latest request is answered or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Vec<FeeUpdate> {
        let deadline = Instant::now() + timeout;
        let mut updates = Vec::new();
        while !self.latest_resolved {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(left) {
                Ok(result) => updates.extend(self.apply(result)),
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!("Timed out waiting for fee lookup");
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        updates
    }

    fn apply(&mut self, result: FeeResult) -> Option<FeeUpdate> {
        if self.latest_seq != Some(result.seq) {
            log::debug!(
                "Discarding stale fee response #{} (latest #{:?})",
                result.seq,
                self.latest_seq
            );
            return None;
        }
        self.latest_resolved = true;

        match result.outcome {
            Ok(response) if response.success => {
                self.zip = Some(result.zip.clone());
                self.zip_input = result.zip.clone();
                self.message = message_for_response(&self.messages, &response, &result.zip);
                Some(FeeUpdate {
                    zip: result.zip,
                    same_day_available: response.same_day_available,
                    cutoff: response.cutoff(),
                })
            }
            Ok(_) => {
                log::warn!("Fee lookup for {} was not successful", result.zip);
                self.message = self.messages.error.clone();
                None
            }
            Err(err) => {
                log::warn!("Fee lookup for {} failed: {}", result.zip, err);
                self.message = self.messages.error.clone();
                None
            }
        }
    }
}
