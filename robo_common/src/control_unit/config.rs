//! Configuration structures for the control unit (`robot.toml`).
//!
//! All config types use `serde::Deserialize` for TOML loading. Every field has
//! a default taken from [`crate::consts`], so an empty file yields the
//! competition configuration. Unknown fields are rejected.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig};
use crate::consts::*;

/// Maximum number of stopping-point preset buttons.
pub const MAX_STOPPING_PRESETS: usize = 8;

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level robot configuration.
///
/// Loaded from TOML at startup and immutable afterwards. The heading gain
/// file named in `[teleop]` is read separately at each teleop entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotConfig {
    pub shared: SharedConfig,
    pub cycle: CycleConfig,
    pub ports: PortConfig,
    pub catapult: CatapultTuning,
    pub collector: CollectorTuning,
    pub autonomous: AutonomousConfig,
    pub teleop: TeleopConfig,
}

impl RobotConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        let sections = [
            ("cycle", self.cycle.validate()),
            ("ports", self.ports.validate()),
            ("catapult", self.catapult.validate()),
            ("collector", self.collector.validate()),
            ("autonomous", self.autonomous.validate()),
            ("teleop", self.teleop.validate()),
        ];
        for (name, result) in sections {
            result.map_err(|e| ConfigError::ValidationError(format!("[{name}] {e}")))?;
        }
        Ok(())
    }
}

fn check_power(name: &str, value: f64) -> Result<(), String> {
    if !(-1.0..=1.0).contains(&value) {
        return Err(format!("{name} {value} out of range [-1, 1]"));
    }
    Ok(())
}

fn check_time(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{name} {value} must be a non-negative number of seconds"));
    }
    Ok(())
}

// ─── Cycle ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycleConfig {
    /// Control period [ms] (default: 20).
    pub period_ms: u64,
    /// Diagnostic display refresh interval [cycles] (default: 5).
    pub diagnostic_interval: u32,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            period_ms: CYCLE_TIME_MS,
            diagnostic_interval: DIAGNOSTIC_INTERVAL_DEFAULT,
        }
    }
}

impl CycleConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.period_ms == 0 || self.period_ms > 1000 {
            return Err(format!("period_ms {} out of range [1, 1000]", self.period_ms));
        }
        if self.diagnostic_interval == 0 {
            return Err("diagnostic_interval must be >= 1".to_string());
        }
        Ok(())
    }
}

// ─── Ports ──────────────────────────────────────────────────────────

/// Channel assignment of every actuator and sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortConfig {
    pub drive_front_left: u8,
    pub drive_rear_left: u8,
    pub drive_front_right: u8,
    pub drive_rear_right: u8,
    pub catapult_motor_one: u8,
    pub catapult_motor_two: u8,
    pub collector_lift: u8,
    pub collector_roller: u8,
    pub catapult_encoder: u8,
    pub lower_limit: u8,
    pub ball_sensor: u8,
    pub range_sensor: u8,
    pub gyro: u8,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            drive_front_left: PORT_DRIVE_FRONT_LEFT,
            drive_rear_left: PORT_DRIVE_REAR_LEFT,
            drive_front_right: PORT_DRIVE_FRONT_RIGHT,
            drive_rear_right: PORT_DRIVE_REAR_RIGHT,
            catapult_motor_one: PORT_CATAPULT_MOTOR_ONE,
            catapult_motor_two: PORT_CATAPULT_MOTOR_TWO,
            collector_lift: PORT_COLLECTOR_LIFT,
            collector_roller: PORT_COLLECTOR_ROLLER,
            catapult_encoder: PORT_CATAPULT_ENCODER,
            lower_limit: PORT_LOWER_LIMIT,
            ball_sensor: PORT_BALL_SENSOR,
            range_sensor: PORT_RANGE_SENSOR,
            gyro: PORT_GYRO,
        }
    }
}

impl PortConfig {
    /// Motor output channels in a fixed order.
    pub fn motor_channels(&self) -> [u8; 8] {
        [
            self.drive_front_left,
            self.drive_rear_left,
            self.drive_front_right,
            self.drive_rear_right,
            self.catapult_motor_one,
            self.catapult_motor_two,
            self.collector_lift,
            self.collector_roller,
        ]
    }

    /// Every channel must exist; motor outputs and the two analog sensors
    /// must not share a channel.
    pub fn validate(&self) -> Result<(), String> {
        let all = [
            ("drive_front_left", self.drive_front_left),
            ("drive_rear_left", self.drive_rear_left),
            ("drive_front_right", self.drive_front_right),
            ("drive_rear_right", self.drive_rear_right),
            ("catapult_motor_one", self.catapult_motor_one),
            ("catapult_motor_two", self.catapult_motor_two),
            ("collector_lift", self.collector_lift),
            ("collector_roller", self.collector_roller),
            ("catapult_encoder", self.catapult_encoder),
            ("lower_limit", self.lower_limit),
            ("ball_sensor", self.ball_sensor),
            ("range_sensor", self.range_sensor),
            ("gyro", self.gyro),
        ];
        for (name, ch) in all {
            if ch as usize >= MAX_CHANNELS {
                return Err(format!("{name} channel {ch} out of range [0, {MAX_CHANNELS})"));
            }
        }

        let motors = self.motor_channels();
        for (i, a) in motors.iter().enumerate() {
            if motors[i + 1..].contains(a) {
                return Err(format!("motor channel {a} assigned twice"));
            }
        }
        if self.ball_sensor == self.range_sensor {
            return Err(format!(
                "ball_sensor and range_sensor share analog channel {}",
                self.ball_sensor
            ));
        }
        Ok(())
    }
}

// ─── Catapult ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatapultTuning {
    /// Firing power (default: 1.0).
    pub motor_power: f64,
    /// Stopping point forced every disabled cycle [clicks].
    pub disabled_stopping_point: i32,
    /// Stopping point of the autonomous shot [clicks].
    pub autonomous_stopping_point: i32,
}

impl Default for CatapultTuning {
    fn default() -> Self {
        Self {
            motor_power: CATAPULT_MOTOR_POWER_DEFAULT,
            disabled_stopping_point: CATAPULT_DISABLED_STOPPING_POINT,
            autonomous_stopping_point: CATAPULT_AUTONOMOUS_STOPPING_POINT,
        }
    }
}

impl CatapultTuning {
    pub fn validate(&self) -> Result<(), String> {
        check_power("motor_power", self.motor_power)?;
        if self.disabled_stopping_point < 0 || self.autonomous_stopping_point < 0 {
            return Err("stopping points must be >= 0".to_string());
        }
        Ok(())
    }
}

// ─── Collector ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectorTuning {
    /// Automatic roller power during autonomous (default: 0.65).
    pub autonomous_roller_power: f64,
    /// Automatic roller power during teleop (default: 1.0).
    pub teleop_roller_power: f64,
}

impl Default for CollectorTuning {
    fn default() -> Self {
        Self {
            autonomous_roller_power: COLLECTOR_AUTONOMOUS_ROLLER_POWER,
            teleop_roller_power: COLLECTOR_TELEOP_ROLLER_POWER,
        }
    }
}

impl CollectorTuning {
    pub fn validate(&self) -> Result<(), String> {
        check_power("autonomous_roller_power", self.autonomous_roller_power)?;
        check_power("teleop_roller_power", self.teleop_roller_power)
    }
}

// ─── Autonomous ─────────────────────────────────────────────────────

/// Timings and gains of the autonomous routine.
///
/// All times are measured on the autonomous timer, from autonomous entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutonomousConfig {
    /// Gate before the catapult unfolding lower [s].
    pub collector_lower_time: f64,
    /// Gate after which unfolding completes [s].
    pub unfolding_done_time: f64,
    /// Opening drive hold [s].
    pub approach_wait_time: f64,
    /// Time after which the shot is taken [s].
    pub fire_time: f64,
    /// Range reading at which the approach stops [raw units].
    pub standoff_distance: i32,
    /// Approach proportional gain.
    pub approach_kp: f64,
    /// Approach integral gain.
    pub approach_ki: f64,
    /// Optional bound on the approach integrator. Unbounded when absent.
    pub integral_limit: Option<f64>,
}

impl Default for AutonomousConfig {
    fn default() -> Self {
        Self {
            collector_lower_time: AUTO_COLLECTOR_LOWER_TIME,
            unfolding_done_time: AUTO_UNFOLDING_DONE_TIME,
            approach_wait_time: AUTO_APPROACH_WAIT_TIME,
            fire_time: AUTO_FIRE_TIME,
            standoff_distance: AUTO_STANDOFF_DISTANCE,
            approach_kp: AUTO_APPROACH_KP,
            approach_ki: AUTO_APPROACH_KI,
            integral_limit: None,
        }
    }
}

impl AutonomousConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_time("collector_lower_time", self.collector_lower_time)?;
        check_time("unfolding_done_time", self.unfolding_done_time)?;
        check_time("approach_wait_time", self.approach_wait_time)?;
        check_time("fire_time", self.fire_time)?;
        if self.unfolding_done_time < self.collector_lower_time {
            return Err(format!(
                "unfolding_done_time {} precedes collector_lower_time {}",
                self.unfolding_done_time, self.collector_lower_time
            ));
        }
        if self.standoff_distance < 0 {
            return Err(format!("standoff_distance {} must be >= 0", self.standoff_distance));
        }
        if !(self.approach_kp.is_finite() && self.approach_ki.is_finite()) {
            return Err("approach gains must be finite".to_string());
        }
        if let Some(limit) = self.integral_limit {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(format!("integral_limit {limit} must be > 0"));
            }
        }
        Ok(())
    }
}

// ─── Teleop ─────────────────────────────────────────────────────────

/// A button that selects a catapult stopping point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoppingPreset {
    pub button: u8,
    pub clicks: i32,
}

const DEFAULT_PRESETS: [StoppingPreset; 4] = [
    StoppingPreset { button: 5, clicks: 69 },
    StoppingPreset { button: 6, clicks: 151 },
    StoppingPreset { button: 9, clicks: 100 },
    StoppingPreset { button: 10, clicks: 131 },
];

/// Driver input bindings. Axis and button numbers are 1-based, as printed
/// on the joystick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TeleopConfig {
    pub axis_x: u8,
    pub axis_y: u8,
    pub axis_twist: u8,
    pub axis_manual_roller: u8,
    pub axis_manual_raise: u8,
    pub button_fire: u8,
    pub button_collector_run: u8,
    pub button_collector_disable: u8,
    pub button_encoder_reset: u8,
    pub button_heading_hold: u8,
    pub stopping_presets: heapless::Vec<StoppingPreset, MAX_STOPPING_PRESETS>,
    /// Path of the plain-text heading gain file.
    pub gains_path: String,
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            axis_x: 1,
            axis_y: 2,
            axis_twist: 3,
            axis_manual_roller: 5,
            axis_manual_raise: 6,
            button_fire: 1,
            button_collector_run: 2,
            button_collector_disable: 3,
            button_encoder_reset: 4,
            button_heading_hold: 7,
            stopping_presets: DEFAULT_PRESETS.into_iter().collect(),
            gains_path: "config/heading_gains.txt".to_string(),
        }
    }
}

impl TeleopConfig {
    pub fn validate(&self) -> Result<(), String> {
        let axes = [
            self.axis_x,
            self.axis_y,
            self.axis_twist,
            self.axis_manual_roller,
            self.axis_manual_raise,
        ];
        for axis in axes {
            if axis == 0 || axis as usize > MAX_AXES {
                return Err(format!("axis {axis} out of range [1, {MAX_AXES}]"));
            }
        }

        let mut buttons: heapless::Vec<u8, { 5 + MAX_STOPPING_PRESETS }> = heapless::Vec::new();
        let fixed = [
            self.button_fire,
            self.button_collector_run,
            self.button_collector_disable,
            self.button_encoder_reset,
            self.button_heading_hold,
        ];
        let presets = self.stopping_presets.iter().map(|p| p.button);
        for button in fixed.into_iter().chain(presets) {
            if button == 0 || button as usize > MAX_BUTTONS {
                return Err(format!("button {button} out of range [1, {MAX_BUTTONS}]"));
            }
            if buttons.contains(&button) {
                return Err(format!("button {button} bound twice"));
            }
            // Capacity covers every binding.
            let _ = buttons.push(button);
        }

        if let Some(p) = self.stopping_presets.iter().find(|p| p.clicks < 0) {
            return Err(format!("preset on button {} has negative clicks", p.button));
        }
        if self.gains_path.is_empty() {
            return Err("gains_path cannot be empty".to_string());
        }
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
