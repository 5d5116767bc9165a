// File: crates/mmr-chart/src/debounce.rs
// Summary: Trailing-edge resize debouncer driven by an injected clock.

use std::time::{Duration, Instant};

use crate::types::Size;

/// Coalesces bursts of resize events; only the last size is delivered, once
/// `delay` has passed without a newer one.
#[derive(Clone, Debug)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<(Instant, Size)>,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Replace any pending resize.
    pub fn schedule(&mut self, now: Instant, size: Size) {
        self.pending = Some((now + self.delay, size));
    }

    /// The size to apply, once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Size> {
        match self.pending {
            Some((due, size)) if now >= due => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(due, _)| due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
