//! Robot orchestrator.
//!
//! Owns every controller for the robot's lifetime and maps the host's
//! lifecycle hooks onto them. The host calls [`Robot::enter`] when the
//! operating mode changes and [`Robot::periodic`] once per control period;
//! each periodic hook ends by ticking the controllers so every actuator is
//! written exactly once per cycle.
//!
//! | Mode       | Entry                                   | Periodic                               |
//! |------------|-----------------------------------------|----------------------------------------|
//! | Disabled   | catapult idle, autonomous timer stopped | fixed stopping point, collector off    |
//! | Autonomous | timer restarted, sequences re-armed     | unfolding + approach-and-fire          |
//! | Teleop     | gain file read, heading filter reset    | joystick mapped onto controller commands |
//! | Test       | none                                    | assisted collector raise, drive zero   |

use std::path::PathBuf;

use robo_common::config::HeadingGains;
use robo_common::control_unit::config::{CatapultTuning, CollectorTuning, RobotConfig, TeleopConfig};
use robo_common::control_unit::state::RobotMode;
use robo_common::hal::clock::SharedClock;
use robo_common::hal::driver::{
    AnalogInput, DiagnosticDisplay, GyroInput, HalDriver, HalError, InputDevice,
};
use tracing::{debug, error, info};

use crate::control::drive::DriveBase;
use crate::control::heading::HeadingCorrector;
use crate::diagnostics::{self, RobotSnapshot};
use crate::state::autonomous::{ApproachSequence, UnfoldingSequence};
use crate::state::catapult::Catapult;
use crate::state::collector::Collector;
use crate::timer::ElapsedTimer;

/// The whole robot: controllers, sensors read by the orchestrator itself,
/// and lifecycle state.
pub struct Robot {
    mode: RobotMode,
    catapult: Catapult,
    collector: Collector,
    drive: DriveBase,
    heading: HeadingCorrector,

    joystick: Box<dyn InputDevice>,
    gyro: Box<dyn GyroInput>,
    range_sensor: Box<dyn AnalogInput>,
    display: Box<dyn DiagnosticDisplay>,

    autonomous_timer: ElapsedTimer,
    unfolding: UnfoldingSequence,
    approach: ApproachSequence,

    /// Gains read at teleop entry; `None` disables heading hold.
    heading_gains: Option<HeadingGains>,
    heading_hold: bool,

    catapult_tuning: CatapultTuning,
    collector_tuning: CollectorTuning,
    teleop: TeleopConfig,
    gains_path: PathBuf,

    cycle_count: u64,
    diagnostic_interval: u64,
}

impl Robot {
    /// Claim every channel from `hal` and build the controllers.
    ///
    /// Corresponds to robot construction plus robot-init: the catapult
    /// starts with the configured firing power.
    ///
    /// # Errors
    ///
    /// Any failed channel claim.
    pub fn new(
        config: &RobotConfig,
        hal: &mut dyn HalDriver,
        clock: SharedClock,
    ) -> Result<Self, HalError> {
        let ports = &config.ports;

        let mut catapult = Catapult::new(
            hal.motor(ports.catapult_motor_one)?,
            hal.motor(ports.catapult_motor_two)?,
            hal.encoder(ports.catapult_encoder)?,
            clock.clone(),
        );
        catapult.set_motor_power(config.catapult.motor_power);

        let collector = Collector::new(
            hal.motor(ports.collector_lift)?,
            hal.motor(ports.collector_roller)?,
            hal.analog_input(ports.ball_sensor)?,
            hal.digital_input(ports.lower_limit)?,
            clock.clone(),
        );

        let drive = DriveBase::new(
            hal.motor(ports.drive_front_left)?,
            hal.motor(ports.drive_rear_left)?,
            hal.motor(ports.drive_front_right)?,
            hal.motor(ports.drive_rear_right)?,
        );

        info!(driver = hal.name(), version = hal.version(), "Channels claimed");

        Ok(Self {
            mode: RobotMode::Disabled,
            catapult,
            collector,
            drive,
            heading: HeadingCorrector::new(clock.clone()),
            joystick: hal.input_device()?,
            gyro: hal.gyro(ports.gyro)?,
            range_sensor: hal.analog_input(ports.range_sensor)?,
            display: hal.display()?,
            autonomous_timer: ElapsedTimer::new(clock),
            unfolding: UnfoldingSequence::new(&config.autonomous),
            approach: ApproachSequence::new(&config.autonomous, &config.catapult),
            heading_gains: None,
            heading_hold: false,
            catapult_tuning: config.catapult.clone(),
            collector_tuning: config.collector.clone(),
            teleop: config.teleop.clone(),
            gains_path: PathBuf::from(&config.teleop.gains_path),
            cycle_count: 0,
            diagnostic_interval: u64::from(config.cycle.diagnostic_interval.max(1)),
        })
    }

    // ─── Lifecycle Dispatch ─────────────────────────────────────────

    /// Switch operating mode and run its entry hook. Test mode has none.
    pub fn enter(&mut self, mode: RobotMode) {
        info!(from = self.mode.name(), to = mode.name(), "Mode change");
        self.mode = mode;
        match mode {
            RobotMode::Disabled => self.disabled_init(),
            RobotMode::Autonomous => self.autonomous_init(),
            RobotMode::Teleop => self.teleop_init(),
            RobotMode::Test => {}
        }
    }

    /// Run the current mode's periodic hook.
    pub fn periodic(&mut self) {
        match self.mode {
            RobotMode::Disabled => self.disabled_periodic(),
            RobotMode::Autonomous => self.autonomous_periodic(),
            RobotMode::Teleop => self.teleop_periodic(),
            RobotMode::Test => self.test_periodic(),
        }
        self.cycle_count += 1;
        if self.cycle_count % self.diagnostic_interval == 0 {
            let snapshot = self.snapshot();
            diagnostics::publish(self.display.as_mut(), &snapshot);
        }
    }

    // ─── Entry Hooks ────────────────────────────────────────────────

    pub fn disabled_init(&mut self) {
        self.catapult.reinit();
        self.autonomous_timer.stop();
    }

    pub fn autonomous_init(&mut self) {
        self.autonomous_timer.reset();
        self.autonomous_timer.start();
        self.unfolding.reset();
        self.approach.reset();
        self.catapult.reset_encoder();
        self.catapult.set_motor_power(self.catapult_tuning.motor_power);
        self.collector
            .set_automatic_roller_power(self.collector_tuning.autonomous_roller_power);
        self.collector.run();
    }

    /// Read the heading gain file and reset the heading filter.
    ///
    /// A missing or malformed gain file does not block teleop: heading hold
    /// is unavailable until the next teleop entry and every other control
    /// works normally.
    pub fn teleop_init(&mut self) {
        self.autonomous_timer.stop();
        self.collector
            .set_automatic_roller_power(self.collector_tuning.teleop_roller_power);
        self.catapult.set_motor_power(self.catapult_tuning.motor_power);

        self.heading_gains = match HeadingGains::load(&self.gains_path) {
            Ok(gains) => {
                info!(
                    kp = gains.kp,
                    ki = gains.ki,
                    spin_threshold = gains.spin_threshold,
                    "Heading gains loaded"
                );
                Some(gains)
            }
            Err(e) => {
                error!(path = %self.gains_path.display(), "Heading hold disabled: {e}");
                None
            }
        };
        self.heading.reinit();
        self.heading_hold = false;
    }

    // ─── Periodic Hooks ─────────────────────────────────────────────

    /// Inputs ignored, everything held safe.
    pub fn disabled_periodic(&mut self) {
        self.catapult
            .set_stopping_point(self.catapult_tuning.disabled_stopping_point);
        self.collector.disable();
        self.drive.stop();
        self.tick_all();
    }

    pub fn autonomous_periodic(&mut self) {
        let elapsed = self.autonomous_timer.elapsed_secs();
        self.unfolding
            .advance(elapsed, &mut self.catapult, &mut self.collector);
        self.approach.advance(
            elapsed,
            self.range_sensor.value(),
            self.unfolding.is_done(),
            &mut self.catapult,
            &mut self.drive,
        );
        self.tick_all();
    }

    pub fn teleop_periodic(&mut self) {
        let bindings = &self.teleop;
        let x = self.joystick.axis(bindings.axis_x);
        let y = self.joystick.axis(bindings.axis_y);
        let twist = self.joystick.axis(bindings.axis_twist);
        let hold_requested = self.joystick.button(bindings.button_heading_hold);
        let rotation = self.rotation_command(x, y, twist, hold_requested);
        self.drive.set_joystick(x, y, rotation);

        let bindings = &self.teleop;
        if self.joystick.button(bindings.button_fire) {
            self.catapult.fire();
        }
        if self.joystick.button(bindings.button_collector_run) {
            self.collector.run();
        }
        if self.joystick.button(bindings.button_collector_disable) {
            self.collector.disable();
        }
        if self.joystick.button(bindings.button_encoder_reset) {
            self.catapult.reset_encoder();
        }
        for preset in &bindings.stopping_presets {
            if self.joystick.button(preset.button) {
                self.catapult.set_stopping_point(preset.clicks);
            }
        }

        let raise = self.joystick.axis(bindings.axis_manual_raise).trunc() as i32;
        let roller = self.joystick.axis(bindings.axis_manual_roller).trunc();
        self.collector.manual_raise(raise);
        self.collector.manual_roller(roller);

        self.tick_all();
    }

    /// Pit mode: catapult idle, drive stopped, collector arm raised gently
    /// for hand stowing. The collector itself is not ticked so the assisted
    /// raise stays on the lift motor.
    pub fn test_periodic(&mut self) {
        self.collector.assisted_manual_raise();
        self.catapult.reinit();
        self.drive.stop();
        self.catapult.tick();
        self.drive.tick();
    }

    /// Twist passed to the drive: the heading corrector's output while the
    /// hold button is held with the twist stick centered, raw twist
    /// otherwise. The gyro is re-referenced when the hold engages so the
    /// held heading is the heading at engagement.
    fn rotation_command(&mut self, x: f64, y: f64, twist: f64, hold_requested: bool) -> f64 {
        let gains = match self.heading_gains {
            Some(gains) if hold_requested && twist.abs() <= gains.spin_threshold => gains,
            _ => {
                if self.heading_hold {
                    debug!("Heading hold released");
                    self.heading_hold = false;
                }
                return twist;
            }
        };

        if !self.heading_hold {
            self.gyro.reset();
            self.heading.reinit();
            self.heading_hold = true;
            debug!("Heading hold engaged");
        }
        self.heading.update(x, y, self.gyro.angle(), &gains)
    }

    fn tick_all(&mut self) {
        self.catapult.tick();
        self.drive.tick();
        self.collector.tick();
    }

    // ─── Accessors ──────────────────────────────────────────────────

    #[inline]
    pub fn mode(&self) -> RobotMode {
        self.mode
    }

    #[inline]
    pub fn catapult(&self) -> &Catapult {
        &self.catapult
    }

    #[inline]
    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    #[inline]
    pub fn drive(&self) -> &DriveBase {
        &self.drive
    }

    #[inline]
    pub fn unfolding(&self) -> &UnfoldingSequence {
        &self.unfolding
    }

    #[inline]
    pub fn approach(&self) -> &ApproachSequence {
        &self.approach
    }

    #[inline]
    pub fn heading_gains(&self) -> Option<HeadingGains> {
        self.heading_gains
    }

    #[inline]
    pub fn heading_hold_active(&self) -> bool {
        self.heading_hold
    }

    /// Elapsed autonomous time [s].
    #[inline]
    pub fn autonomous_elapsed(&self) -> f64 {
        self.autonomous_timer.elapsed_secs()
    }

    pub fn snapshot(&self) -> RobotSnapshot {
        RobotSnapshot {
            mode: self.mode,
            catapult_phase: self.catapult.phase(),
            encoder_count: self.catapult.encoder_count(),
            stopping_point: self.catapult.stopping_point(),
            motor_power: self.catapult.motor_power(),
            collector_mode: self.collector.mode(),
            unfolding: self.unfolding.phase(),
            approach: self.approach.phase(),
            fired: self.approach.fired(),
            heading_hold: self.heading_hold,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
