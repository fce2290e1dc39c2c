//! Debouncing of query text
//!
//! Only the latest text survives an idle window: scheduling new text while
//! one is pending replaces it and restarts the window. Time is passed in so
//! the debouncer stays a plain data structure.

use std::time::{Duration, Instant};

/// Default idle window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 120;

#[derive(Debug, Clone)]
struct Pending {
    text: String,
    deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl Debouncer {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(debounce_ms),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `text`, superseding whatever was pending
    pub fn schedule(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            text: text.into(),
            deadline: now + self.delay,
        });
    }

    /// Take the pending text once its idle window has elapsed
    pub fn take_ready(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take().map(|p| p.text),
            _ => None,
        }
    }

    /// When the pending text becomes ready, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending text without sending it
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
