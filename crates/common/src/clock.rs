//! Clock and timing utilities for tracking runs.
//!
//! A tracking run is anchored to a monotonic epoch recorded when the
//! detection loop starts. The loop has no fixed cadence, so these
//! helpers only measure; they never pace the loop.

use std::time::{Duration, Instant};

/// A run clock that provides monotonic timestamps relative to
/// the moment a tracking run started.
#[derive(Debug, Clone)]
pub struct SessionClock {
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Nanoseconds elapsed since the run started.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Seconds elapsed since the run started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at run start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Average events per second over the run so far.
    pub fn rate_per_sec(&self, count: u64) -> f64 {
        per_second(count, self.elapsed_secs())
    }
}

/// Average rate of `count` events over `secs` seconds; zero for empty spans.
pub fn per_second(count: u64, secs: f64) -> f64 {
    if secs <= 0.0 {
        0.0
    } else {
        count as f64 / secs
    }
}

/// Gate for periodic work such as progress logging.
#[derive(Debug)]
pub struct RateController {
    interval_ns: u64,
    last_tick_ns: Option<u64>,
}

impl RateController {
    /// Create a controller that fires at most once per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ns: interval.as_nanos() as u64,
            last_tick_ns: None,
        }
    }

    /// Returns true and records the tick if the interval has elapsed.
    /// The first call always returns true.
    pub fn should_tick(&mut self, current_ns: u64) -> bool {
        match self.last_tick_ns {
            None => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            Some(last) if current_ns >= last + self.interval_ns => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            _ => false,
        }
    }
}
