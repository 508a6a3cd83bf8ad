//! Remaining-time estimation for a running export.
//!
//! The estimate is deliberately simple: it extrapolates from the duration of
//! the immediately preceding page only, with no moving average, so it is
//! volatile under uneven page latency. Callers that want smoothing can layer
//! it on top of the raw per-page estimates.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Injectable time source so tests can supply deterministic timestamps.
pub trait Clock: Send + Sync {
    /// Milliseconds since some fixed epoch. Only differences matter.
    fn now_millis(&self) -> u64;
}

/// Wall-clock `Clock` used in production.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Derives an ETA from per-page elapsed time and remaining row count.
#[derive(Debug, Default)]
pub struct ProgressEstimator {
    last_page_at: Option<u64>,
}

impl ProgressEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed page at `now_millis` and, when a previous page
    /// timestamp exists, returns the new estimate:
    ///
    /// `round(rows_remaining / page_size) * (now - previous)`
    ///
    /// The first page of a run returns `None` — the caller keeps its prior
    /// estimate (zero at job start).
    pub fn on_page_complete(
        &mut self,
        now_millis: u64,
        rows_remaining: u64,
        page_size: u64,
    ) -> Option<Duration> {
        let estimate = self.last_page_at.map(|prev| {
            let elapsed = now_millis.saturating_sub(prev);
            let pages_left = (rows_remaining as f64 / page_size as f64).round() as u64;
            Duration::from_millis(pages_left.saturating_mul(elapsed))
        });
        self.last_page_at = Some(now_millis);
        estimate
    }
}
