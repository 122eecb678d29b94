//! Fixed-period cycle runner and lifecycle dispatch.
//!
//! Each cycle:
//! 1. Sample the desired mode from the [`ModeSource`]; on a change, run the
//!    mode's entry hook.
//! 2. Run the mode's periodic hook (sensors → state machines → actuators).
//! 3. Step the HAL by one period (plant models, input refresh).
//! 4. Record timing and pace to the next period.
//!
//! ## Pacing
//! - [`Pacing::Simulated`] advances a [`SimClock`] by exactly one period per
//!   cycle and never sleeps: runs are deterministic and as fast as the CPU.
//! - [`Pacing::Realtime`] sleeps to absolute wall-clock deadlines.
//!
//! An overrun is counted and logged, never fatal: outputs from the previous
//! cycle stay on the actuators until the next one completes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use robo_common::control_unit::state::RobotMode;
use robo_common::hal::clock::SharedClock;
use robo_common::hal::driver::{HalDriver, HalError};
use robo_hal::SimClock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::LoadedConfig;
use crate::orchestrator::Robot;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: i64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: i64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Cycles whose body took longer than the period.
    pub overruns: u64,
    /// Maximum wake-up lateness [ns] (realtime pacing only).
    pub max_latency_ns: i64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
            max_latency_ns: 0,
        }
    }

    /// Record a cycle duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64, latency_ns: i64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns = self.sum_cycle_ns.saturating_add(duration_ns);
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
    }

    /// Average cycle time [ns] (returns 0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors while building the cycle runner.
#[derive(Debug, Error)]
pub enum CycleError {
    /// A channel could not be claimed from the HAL.
    #[error("HAL setup failed: {0}")]
    Hal(#[from] HalError),

    /// Configured control period is zero.
    #[error("control period must be non-zero")]
    ZeroPeriod,
}

// ─── Mode Sources ───────────────────────────────────────────────────

/// Supplies the operating mode requested for each cycle.
pub trait ModeSource {
    /// Desired mode at `elapsed` time since the runner started.
    fn mode(&mut self, elapsed: Duration) -> RobotMode;
}

/// A constant mode.
impl ModeSource for RobotMode {
    fn mode(&mut self, _elapsed: Duration) -> RobotMode {
        *self
    }
}

/// Timed match script: each segment holds its mode for its duration, then
/// `final_mode` holds forever.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSchedule {
    segments: Vec<(RobotMode, Duration)>,
    final_mode: RobotMode,
}

impl MatchSchedule {
    pub fn new(segments: Vec<(RobotMode, Duration)>, final_mode: RobotMode) -> Self {
        Self {
            segments,
            final_mode,
        }
    }

    /// Pre-match disable, 10 s autonomous, 20 s teleop, then disabled.
    pub fn standard() -> Self {
        Self::new(
            vec![
                (RobotMode::Disabled, Duration::from_millis(500)),
                (RobotMode::Autonomous, Duration::from_secs(10)),
                (RobotMode::Teleop, Duration::from_secs(20)),
            ],
            RobotMode::Disabled,
        )
    }

    /// Time until `final_mode` takes over.
    pub fn total_duration(&self) -> Duration {
        self.segments.iter().map(|(_, d)| *d).sum()
    }
}

impl ModeSource for MatchSchedule {
    fn mode(&mut self, elapsed: Duration) -> RobotMode {
        let mut end = Duration::ZERO;
        for (mode, duration) in &self.segments {
            end += *duration;
            if elapsed < end {
                return *mode;
            }
        }
        self.final_mode
    }
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// How the runner advances time between cycles.
pub enum Pacing {
    /// Advance this clock by one period per cycle; never sleep.
    Simulated(Arc<SimClock>),
    /// Sleep to absolute wall-clock deadlines.
    Realtime,
}

/// Owns the robot, its HAL and the mode source, and runs the cycle loop.
pub struct CycleRunner<H: HalDriver> {
    robot: Robot,
    hal: H,
    modes: Box<dyn ModeSource>,
    clock: SharedClock,
    pacing: Pacing,
    period: Duration,
    /// Clock reading at construction; mode sources see time from here.
    origin: Duration,
    /// Mode whose entry hook has run; `None` before the first cycle.
    active_mode: Option<RobotMode>,
    stats: CycleStats,
}

impl<H: HalDriver> CycleRunner<H> {
    /// Build the robot on `hal` and prepare the loop.
    ///
    /// # Errors
    ///
    /// `ZeroPeriod` for a zero control period, `Hal` if a channel claim fails.
    pub fn new(
        config: &LoadedConfig,
        mut hal: H,
        modes: Box<dyn ModeSource>,
        clock: SharedClock,
        pacing: Pacing,
    ) -> Result<Self, CycleError> {
        let period = Duration::from_millis(config.robot.cycle.period_ms);
        if period.is_zero() {
            return Err(CycleError::ZeroPeriod);
        }
        let robot = Robot::new(&config.robot, &mut hal, clock.clone())?;
        let origin = clock.now();
        Ok(Self {
            robot,
            hal,
            modes,
            clock,
            pacing,
            period,
            origin,
            active_mode: None,
            stats: CycleStats::new(),
        })
    }

    /// Execute one cycle body (mode dispatch, periodic hook, HAL step)
    /// without pacing. Returns the body's duration.
    pub fn run_cycle(&mut self) -> Duration {
        let start = Instant::now();

        let elapsed = self.clock.now().saturating_sub(self.origin);
        let mode = self.modes.mode(elapsed);
        if self.active_mode != Some(mode) {
            self.robot.enter(mode);
            self.active_mode = Some(mode);
        }
        self.robot.periodic();
        self.hal.step(self.period);

        start.elapsed()
    }

    /// Run until `max_cycles` cycles have executed (`None` = unbounded) or
    /// `running` is cleared.
    pub fn run(&mut self, max_cycles: Option<u64>, running: &AtomicBool) -> &CycleStats {
        info!(
            period_ms = self.period.as_millis() as u64,
            driver = self.hal.name(),
            realtime = matches!(self.pacing, Pacing::Realtime),
            "Entering cycle loop"
        );

        let mut next_deadline = Instant::now() + self.period;
        let mut executed = 0u64;
        while running.load(Ordering::SeqCst) && max_cycles.is_none_or(|max| executed < max) {
            let body = self.run_cycle();
            executed += 1;

            let latency_ns = match &self.pacing {
                Pacing::Simulated(clock) => {
                    clock.advance(self.period);
                    0
                }
                Pacing::Realtime => {
                    let now = Instant::now();
                    if let Some(remaining) = next_deadline.checked_duration_since(now) {
                        std::thread::sleep(remaining);
                    }
                    let woke = Instant::now();
                    let late = woke.saturating_duration_since(next_deadline);
                    next_deadline += self.period;
                    if late > self.period {
                        // Too far behind to catch up; restart the schedule.
                        debug!(late_ms = late.as_millis() as u64, "Cycle schedule resynchronized");
                        next_deadline = woke + self.period;
                    }
                    late.as_nanos() as i64
                }
            };
            self.record(body, latency_ns);
        }

        info!(
            cycles = self.stats.cycle_count,
            avg_us = self.stats.avg_cycle_ns() / 1000,
            max_us = self.stats.max_cycle_ns / 1000,
            overruns = self.stats.overruns,
            "Cycle loop finished"
        );
        &self.stats
    }

    fn record(&mut self, body: Duration, latency_ns: i64) {
        let duration_ns = body.as_nanos() as i64;
        self.stats.record(duration_ns, latency_ns);
        if body > self.period {
            self.stats.overruns += 1;
            warn!(
                cycle = self.stats.cycle_count,
                duration_us = duration_ns / 1000,
                budget_us = self.period.as_micros() as u64,
                "Cycle overrun"
            );
        }
    }

    #[inline]
    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
