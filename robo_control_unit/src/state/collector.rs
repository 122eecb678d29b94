//! Collector state machine.
//!
//! Arm-lift and roller motors, a ball-presence sensor and the arm's lower
//! limit switch. The top-level [`CollectorMode`] selects who drives the
//! motors; in `Automatic` a nested [`CollectorSubstate`] runs the
//! collect-and-lift cycle:
//!
//! | Substate    | Holds while                 | Lift | Roller    |
//! |-------------|-----------------------------|------|-----------|
//! | Lowering    | lower limit reads true      | −0.4 | 0         |
//! | Waiting     | ball sensor < threshold     | 0    | automatic |
//! | WaitForBall | phase timer < settle time   | 0    | automatic |
//! | Raising     | phase timer < raise time    | 0.6  | automatic |
//!
//! On the cycle a substate's hold condition fails, the machine moves to the
//! next substate and leaves the outputs untouched.

use robo_common::consts::{
    COLLECTOR_ASSISTED_RAISE_POWER, COLLECTOR_BALL_THRESHOLD, COLLECTOR_LOWERING_POWER,
    COLLECTOR_MANUAL_LOWER_POWER, COLLECTOR_MANUAL_RAISE_POWER, COLLECTOR_RAISE_TIME,
    COLLECTOR_RAISING_POWER, COLLECTOR_SETTLE_TIME,
};
use robo_common::control_unit::state::{CollectorMode, CollectorSubstate};
use robo_common::hal::clock::SharedClock;
use robo_common::hal::driver::{AnalogInput, DigitalInput, MotorOutput};
use tracing::debug;

use crate::timer::ElapsedTimer;

/// Collector controller.
pub struct Collector {
    lift: Box<dyn MotorOutput>,
    roller: Box<dyn MotorOutput>,
    ball_sensor: Box<dyn AnalogInput>,
    lower_limit: Box<dyn DigitalInput>,
    /// Dwell timer for `WaitForBall` and `Raising`.
    timer: ElapsedTimer,
    mode: CollectorMode,
    /// Driver roller request; negated on output.
    manual_roller_power: f64,
    /// Driver arm request: < 0 lower, > 0 raise.
    manual_raise_direction: i32,
    automatic_roller_power: f64,
}

impl Collector {
    /// Create a disabled collector with its phase timer running.
    pub fn new(
        lift: Box<dyn MotorOutput>,
        roller: Box<dyn MotorOutput>,
        ball_sensor: Box<dyn AnalogInput>,
        lower_limit: Box<dyn DigitalInput>,
        clock: SharedClock,
    ) -> Self {
        Self {
            lift,
            roller,
            ball_sensor,
            lower_limit,
            timer: ElapsedTimer::started(clock),
            mode: CollectorMode::Disabled,
            manual_roller_power: 0.0,
            manual_raise_direction: 0,
            automatic_roller_power: 0.0,
        }
    }

    // ─── Commands ───────────────────────────────────────────────────

    /// Enter automatic mode at `Lowering`.
    pub fn run(&mut self) {
        self.set_mode(CollectorMode::Automatic(CollectorSubstate::Lowering));
    }

    pub fn disable(&mut self) {
        self.set_mode(CollectorMode::Disabled);
    }

    /// A non-zero power takes manual control of the roller; zero only
    /// clears the stored power.
    pub fn manual_roller(&mut self, power: f64) {
        if power != 0.0 {
            self.set_mode(CollectorMode::ManualRoller);
            self.manual_roller_power = power;
        } else {
            self.manual_roller_power = 0.0;
        }
    }

    /// A non-zero direction takes manual control of the arm; zero only
    /// clears the stored direction.
    pub fn manual_raise(&mut self, direction: i32) {
        if direction != 0 {
            self.set_mode(CollectorMode::ManualRaise);
            self.manual_raise_direction = direction;
        } else {
            self.manual_raise_direction = 0;
        }
    }

    /// One-shot low-power lift for stowing by hand. Writes the lift motor
    /// immediately and leaves the mode alone.
    pub fn assisted_manual_raise(&mut self) {
        self.lift.set_power(COLLECTOR_ASSISTED_RAISE_POWER);
    }

    /// Roller power used by every automatic substate.
    pub fn set_automatic_roller_power(&mut self, power: f64) {
        self.automatic_roller_power = power;
    }

    // ─── Accessors ──────────────────────────────────────────────────

    #[inline]
    pub fn mode(&self) -> CollectorMode {
        self.mode
    }

    #[inline]
    pub fn automatic_roller_power(&self) -> f64 {
        self.automatic_roller_power
    }

    #[inline]
    pub fn ball_present(&self) -> bool {
        self.ball_sensor.value() >= COLLECTOR_BALL_THRESHOLD
    }

    // ─── Cycle ──────────────────────────────────────────────────────

    pub fn tick(&mut self) {
        match self.mode {
            CollectorMode::Automatic(substate) => self.tick_automatic(substate),
            CollectorMode::Disabled => {
                self.lift.set_power(0.0);
                self.roller.set_power(0.0);
                self.timer.stop();
            }
            CollectorMode::ManualRoller => {
                self.roller.set_power(-self.manual_roller_power);
                self.lift.set_power(0.0);
            }
            CollectorMode::ManualRaise => {
                let power = match self.manual_raise_direction {
                    d if d < 0 => COLLECTOR_MANUAL_LOWER_POWER,
                    d if d > 0 => COLLECTOR_MANUAL_RAISE_POWER,
                    _ => 0.0,
                };
                self.lift.set_power(power);
            }
        }
    }

    fn tick_automatic(&mut self, substate: CollectorSubstate) {
        let hold = match substate {
            CollectorSubstate::Lowering => self.lower_limit.state(),
            CollectorSubstate::Waiting => !self.ball_present(),
            CollectorSubstate::WaitForBall => self.timer.elapsed_secs() < COLLECTOR_SETTLE_TIME,
            CollectorSubstate::Raising => self.timer.elapsed_secs() < COLLECTOR_RAISE_TIME,
        };

        if hold {
            let (lift, roller) = match substate {
                CollectorSubstate::Lowering => (COLLECTOR_LOWERING_POWER, 0.0),
                CollectorSubstate::Waiting | CollectorSubstate::WaitForBall => {
                    (0.0, self.automatic_roller_power)
                }
                CollectorSubstate::Raising => {
                    (COLLECTOR_RAISING_POWER, self.automatic_roller_power)
                }
            };
            self.lift.set_power(lift);
            self.roller.set_power(roller);
            return;
        }

        // Both timed substates begin with a fresh, running timer.
        if matches!(
            substate,
            CollectorSubstate::Waiting | CollectorSubstate::WaitForBall
        ) {
            self.timer.reset();
            self.timer.start();
        }
        self.set_mode(CollectorMode::Automatic(substate.next()));
    }

    fn set_mode(&mut self, next: CollectorMode) {
        if self.mode != next {
            debug!(from = %ModeLabel(self.mode), to = %ModeLabel(next), "Collector mode");
        }
        self.mode = next;
    }
}

/// `mode` or `mode/substate` for log fields.
struct ModeLabel(CollectorMode);

impl std::fmt::Display for ModeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.substate() {
            Some(sub) => write!(f, "{}/{}", self.0.name(), sub.name()),
            None => f.write_str(self.0.name()),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
