//! Clock implementations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use robo_common::hal::clock::Clock;

/// Wall clock backed by `std::time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Simulated clock advanced explicitly.
///
/// Gives tests and the simulation binary deterministic timing: time moves
/// only through [`SimClock::advance`].
#[derive(Debug, Default)]
pub struct SimClock {
    nanos: AtomicU64,
}

impl SimClock {
    /// Create a clock at `t = 0`.
    pub const fn new() -> Self {
        Self {
            nanos: AtomicU64::new(0),
        }
    }

    /// Move time forward by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.nanos.fetch_add(dt.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Move time forward by `secs` seconds.
    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }
}

impl Clock for SimClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}
