//! Autonomous routine: unfolding and approach-and-fire.
//!
//! Both sequences are advanced once per autonomous cycle against the same
//! autonomous timer, unfolding first. Neither ever moves backwards; both are
//! re-armed by [`UnfoldingSequence::reset`] / [`ApproachSequence::reset`] at
//! autonomous entry.
//!
//! ## Unfolding
//! ```text
//! LowerCollector ─(t ≥ 1.5s)→ LowerCatapult → WaitForCatapult
//!   ─(catapult in AutoLowering)→ AwaitCompletion ─(t ≥ 4s)→ Done
//! ```
//! The collector lowers itself in automatic mode from autonomous entry;
//! reaching `Done` disables it.
//!
//! ## Approach and fire
//! ```text
//! Waiting ─(t ≥ 1s)→ Running ─(range ≤ standoff)→ Stopped
//! ```
//! While running, the shot is taken once `t > fire_time` and unfolding is
//! done. A sequence that reaches `Stopped` before the fire time never fires.

use robo_common::control_unit::config::{AutonomousConfig, CatapultTuning};
use robo_common::control_unit::state::{ApproachPhase, CatapultPhase, UnfoldingPhase};
use tracing::{debug, info};

use crate::control::approach::RangeApproach;
use crate::control::drive::DriveBase;
use crate::state::catapult::Catapult;
use crate::state::collector::Collector;

// ─── Unfolding ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct UnfoldingSequence {
    phase: UnfoldingPhase,
    collector_lower_time: f64,
    done_time: f64,
}

impl UnfoldingSequence {
    pub fn new(config: &AutonomousConfig) -> Self {
        Self {
            phase: UnfoldingPhase::LowerCollector,
            collector_lower_time: config.collector_lower_time,
            done_time: config.unfolding_done_time,
        }
    }

    pub fn reset(&mut self) {
        self.phase = UnfoldingPhase::LowerCollector;
    }

    #[inline]
    pub fn phase(&self) -> UnfoldingPhase {
        self.phase
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.phase == UnfoldingPhase::Done
    }

    /// Advance one cycle at autonomous time `elapsed` [s].
    pub fn advance(&mut self, elapsed: f64, catapult: &mut Catapult, collector: &mut Collector) {
        match self.phase {
            UnfoldingPhase::LowerCollector => {
                if elapsed >= self.collector_lower_time {
                    catapult.reset_lowering_timer();
                    self.transition(UnfoldingPhase::LowerCatapult);
                }
            }
            UnfoldingPhase::LowerCatapult => {
                catapult.autonomous_lower();
                self.transition(UnfoldingPhase::WaitForCatapult);
            }
            UnfoldingPhase::WaitForCatapult => {
                if catapult.phase() == CatapultPhase::AutoLowering {
                    self.transition(UnfoldingPhase::AwaitCompletion);
                }
            }
            UnfoldingPhase::AwaitCompletion => {
                if elapsed >= self.done_time {
                    collector.disable();
                    self.transition(UnfoldingPhase::Done);
                    info!(elapsed, "Unfolding complete");
                }
            }
            UnfoldingPhase::Done => {}
        }
    }

    fn transition(&mut self, next: UnfoldingPhase) {
        debug!(from = self.phase.name(), to = next.name(), "Unfolding phase");
        self.phase = next;
    }
}

// ─── Approach and fire ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ApproachSequence {
    phase: ApproachPhase,
    fired: bool,
    wait_time: f64,
    fire_time: f64,
    shot_power: f64,
    shot_stopping_point: i32,
    approach: RangeApproach,
}

impl ApproachSequence {
    pub fn new(config: &AutonomousConfig, catapult: &CatapultTuning) -> Self {
        Self {
            phase: ApproachPhase::Waiting,
            fired: false,
            wait_time: config.approach_wait_time,
            fire_time: config.fire_time,
            shot_power: catapult.motor_power,
            shot_stopping_point: catapult.autonomous_stopping_point,
            approach: RangeApproach::new(config),
        }
    }

    /// Re-arm for a new autonomous period: `Waiting`, not fired, integrator
    /// cleared.
    pub fn reset(&mut self) {
        self.phase = ApproachPhase::Waiting;
        self.fired = false;
        self.approach.reset();
    }

    #[inline]
    pub fn phase(&self) -> ApproachPhase {
        self.phase
    }

    #[inline]
    pub fn fired(&self) -> bool {
        self.fired
    }

    #[inline]
    pub fn cumulative_error(&self) -> f64 {
        self.approach.cumulative_error()
    }

    /// Advance one cycle at autonomous time `elapsed` [s] with the current
    /// range reading.
    pub fn advance(
        &mut self,
        elapsed: f64,
        range: i32,
        unfolding_done: bool,
        catapult: &mut Catapult,
        drive: &mut DriveBase,
    ) {
        match self.phase {
            ApproachPhase::Waiting => {
                if elapsed < self.wait_time {
                    drive.stop();
                } else {
                    self.transition(ApproachPhase::Running);
                }
            }
            ApproachPhase::Running => {
                if elapsed > self.fire_time && !self.fired && unfolding_done {
                    drive.stop();
                    catapult.reset_encoder();
                    catapult.set_motor_power(self.shot_power);
                    catapult.set_stopping_point(self.shot_stopping_point);
                    catapult.fire();
                    self.fired = true;
                    info!(elapsed, range, "Autonomous shot fired");
                } else if let Some(y) = self.approach.update(range) {
                    drive.set_joystick(0.0, y, 0.0);
                } else {
                    self.transition(ApproachPhase::Stopped);
                }
            }
            ApproachPhase::Stopped => drive.stop(),
        }
    }

    fn transition(&mut self, next: ApproachPhase) {
        debug!(from = self.phase.name(), to = next.name(), "Approach phase");
        self.phase = next;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
