//! Stopwatch over the shared clock.

use std::time::Duration;

use robo_common::hal::clock::SharedClock;

/// Monotonic stopwatch.
///
/// Elapsed time is the accumulated time of every running span. Reading it
/// has no side effects; the timer is sampled, never scheduled.
#[derive(Clone)]
pub struct ElapsedTimer {
    clock: SharedClock,
    /// Clock reading when the current running span began.
    started_at: Option<Duration>,
    /// Time accumulated by finished spans.
    accumulated: Duration,
}

impl ElapsedTimer {
    /// Create a stopped timer at zero.
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    /// Create a timer that is already running.
    pub fn started(clock: SharedClock) -> Self {
        let mut timer = Self::new(clock);
        timer.start();
        timer
    }

    /// Start counting. No effect if already running.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(self.clock.now());
        }
    }

    /// Freeze the elapsed time.
    pub fn stop(&mut self) {
        if let Some(start) = self.started_at.take() {
            self.accumulated += self.clock.now().saturating_sub(start);
        }
    }

    /// Zero the elapsed time. A running timer keeps running.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        if self.started_at.is_some() {
            self.started_at = Some(self.clock.now());
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(start) => self.accumulated + self.clock.now().saturating_sub(start),
            None => self.accumulated,
        }
    }

    /// Elapsed time [s].
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl std::fmt::Debug for ElapsedTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElapsedTimer")
            .field("running", &self.is_running())
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
