//! Catapult firing state machine.
//!
//! Two ganged launch motors and a position encoder. `fire()` drives the arm
//! until the encoder reaches the stopping point, then the arm is lowered
//! gently for a fixed time and the encoder is re-zeroed:
//!
//! ```text
//! Idle → Firing → Lowering → Zeroing → Idle
//!                 AutoLowering ↗
//! ```
//!
//! Commands only change the phase or tuning; outputs are written by
//! [`Catapult::tick`], once per control cycle.

use robo_common::consts::{
    CATAPULT_AUTO_LOWERING_POWER, CATAPULT_AUTO_LOWERING_TIME, CATAPULT_DISABLED_STOPPING_POINT,
    CATAPULT_LOWERING_POWER, CATAPULT_LOWERING_TIME, CATAPULT_MOTOR_POWER_DEFAULT,
};
use robo_common::control_unit::state::CatapultPhase;
use robo_common::hal::clock::SharedClock;
use robo_common::hal::driver::{EncoderInput, MotorOutput};
use tracing::debug;

use crate::timer::ElapsedTimer;

/// Catapult controller.
pub struct Catapult {
    motors: [Box<dyn MotorOutput>; 2],
    encoder: Box<dyn EncoderInput>,
    lowering_timer: ElapsedTimer,
    phase: CatapultPhase,
    /// Encoder count at which firing stops [clicks].
    stopping_point: i32,
    /// Firing power, passed to the motors unclamped.
    motor_power: f64,
}

impl Catapult {
    /// Create a catapult in `Idle` with the lowering timer running.
    pub fn new(
        motor_one: Box<dyn MotorOutput>,
        motor_two: Box<dyn MotorOutput>,
        encoder: Box<dyn EncoderInput>,
        clock: SharedClock,
    ) -> Self {
        Self {
            motors: [motor_one, motor_two],
            encoder,
            lowering_timer: ElapsedTimer::started(clock),
            phase: CatapultPhase::Idle,
            stopping_point: CATAPULT_DISABLED_STOPPING_POINT,
            motor_power: CATAPULT_MOTOR_POWER_DEFAULT,
        }
    }

    // ─── Commands ───────────────────────────────────────────────────

    /// Start a shot. Valid from any phase; re-firing restarts the
    /// comparison against the current encoder count.
    pub fn fire(&mut self) {
        self.transition(CatapultPhase::Firing);
    }

    /// Side entry used to unfold the robot at autonomous start.
    pub fn autonomous_lower(&mut self) {
        self.transition(CatapultPhase::AutoLowering);
    }

    /// Force `Idle`.
    pub fn reinit(&mut self) {
        self.transition(CatapultPhase::Idle);
    }

    pub fn set_stopping_point(&mut self, clicks: i32) {
        self.stopping_point = clicks;
    }

    pub fn set_motor_power(&mut self, power: f64) {
        self.motor_power = power;
    }

    pub fn reset_encoder(&mut self) {
        self.encoder.reset();
    }

    pub fn reset_lowering_timer(&mut self) {
        self.lowering_timer.reset();
    }

    // ─── Accessors ──────────────────────────────────────────────────

    #[inline]
    pub fn phase(&self) -> CatapultPhase {
        self.phase
    }

    #[inline]
    pub fn encoder_count(&self) -> i32 {
        self.encoder.count()
    }

    #[inline]
    pub fn stopping_point(&self) -> i32 {
        self.stopping_point
    }

    #[inline]
    pub fn motor_power(&self) -> f64 {
        self.motor_power
    }

    // ─── Cycle ──────────────────────────────────────────────────────

    /// Emit this cycle's motor output and take at most one transition.
    pub fn tick(&mut self) {
        match self.phase {
            CatapultPhase::Idle => self.set_motors(0.0),
            CatapultPhase::Firing => {
                if self.encoder.count() < self.stopping_point {
                    self.set_motors(self.motor_power);
                } else {
                    self.set_motors(0.0);
                    self.lowering_timer.reset();
                    self.transition(CatapultPhase::Lowering);
                }
            }
            CatapultPhase::Lowering => {
                if self.lowering_timer.elapsed_secs() < CATAPULT_LOWERING_TIME {
                    self.set_motors(CATAPULT_LOWERING_POWER);
                } else {
                    self.transition(CatapultPhase::Zeroing);
                }
            }
            CatapultPhase::Zeroing => {
                self.encoder.reset();
                self.transition(CatapultPhase::Idle);
            }
            CatapultPhase::AutoLowering => {
                if self.lowering_timer.elapsed_secs() < CATAPULT_AUTO_LOWERING_TIME {
                    self.set_motors(CATAPULT_AUTO_LOWERING_POWER);
                } else {
                    self.transition(CatapultPhase::Zeroing);
                }
            }
        }
    }

    fn set_motors(&mut self, power: f64) {
        for motor in &mut self.motors {
            motor.set_power(power);
        }
    }

    fn transition(&mut self, next: CatapultPhase) {
        if self.phase != next {
            debug!(from = self.phase.name(), to = next.name(), "Catapult phase");
        }
        self.phase = next;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
