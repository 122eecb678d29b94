//! System-wide constants for the robot workspace.
//!
//! Single source of truth for control-loop thresholds, sequence timings and
//! default channel assignments. Configuration defaults are built from these
//! values; the state machines use the fixed ones directly.

use static_assertions::const_assert;

// ─── Cycle ──────────────────────────────────────────────────────────

/// Nominal control period in milliseconds.
pub const CYCLE_TIME_MS: u64 = 20;

/// Default diagnostic refresh interval [cycles].
pub const DIAGNOSTIC_INTERVAL_DEFAULT: u32 = 5;

// ─── Catapult ───────────────────────────────────────────────────────

/// Duration of the post-shot lowering phase [s].
pub const CATAPULT_LOWERING_TIME: f64 = 1.25;

/// Motor power while lowering after a shot.
pub const CATAPULT_LOWERING_POWER: f64 = -0.07;

/// Duration of the autonomous unfolding lower [s].
pub const CATAPULT_AUTO_LOWERING_TIME: f64 = 0.5;

/// Motor power during the autonomous unfolding lower.
pub const CATAPULT_AUTO_LOWERING_POWER: f64 = -0.30;

/// Default firing power (robot-init value).
pub const CATAPULT_MOTOR_POWER_DEFAULT: f64 = 1.0;

/// Stopping point forced while disabled [clicks].
pub const CATAPULT_DISABLED_STOPPING_POINT: i32 = 140;

/// Stopping point of the autonomous shot [clicks].
pub const CATAPULT_AUTONOMOUS_STOPPING_POINT: i32 = 151;

// ─── Collector ──────────────────────────────────────────────────────

/// Lift power while lowering to the limit switch.
pub const COLLECTOR_LOWERING_POWER: f64 = -0.4;

/// Lift power while raising a collected ball.
pub const COLLECTOR_RAISING_POWER: f64 = 0.6;

/// Lift power for the human-assisted stowing raise.
pub const COLLECTOR_ASSISTED_RAISE_POWER: f64 = 0.3;

/// Lift power for a manual "lower" request (direction < 0).
pub const COLLECTOR_MANUAL_LOWER_POWER: f64 = 0.45;

/// Lift power for a manual "raise" request (direction > 0).
pub const COLLECTOR_MANUAL_RAISE_POWER: f64 = -0.4;

/// Ball sensor reading at or above which a ball is present (closer = larger).
pub const COLLECTOR_BALL_THRESHOLD: i32 = 300;

/// Settling dwell after the ball passes the sensor [s].
pub const COLLECTOR_SETTLE_TIME: f64 = 0.3;

/// Duration of the raising phase [s].
pub const COLLECTOR_RAISE_TIME: f64 = 0.75;

/// Automatic roller power during autonomous.
pub const COLLECTOR_AUTONOMOUS_ROLLER_POWER: f64 = 0.65;

/// Automatic roller power during teleop.
pub const COLLECTOR_TELEOP_ROLLER_POWER: f64 = 1.0;

// ─── Heading corrector ──────────────────────────────────────────────

/// Joystick movement that counts as the driver re-steering.
pub const HEADING_JOYSTICK_DEADBAND: f64 = 0.01;

// ─── Autonomous ─────────────────────────────────────────────────────

/// Elapsed time before the catapult unfolding lower is commanded [s].
pub const AUTO_COLLECTOR_LOWER_TIME: f64 = 1.5;

/// Elapsed time after which unfolding is complete and the collector stops [s].
pub const AUTO_UNFOLDING_DONE_TIME: f64 = 4.0;

/// Drive hold at the start of autonomous [s].
pub const AUTO_APPROACH_WAIT_TIME: f64 = 1.0;

/// Elapsed time after which the autonomous shot is taken [s].
pub const AUTO_FIRE_TIME: f64 = 7.0;

/// Range reading at which the approach stops [raw units].
pub const AUTO_STANDOFF_DISTANCE: i32 = 95;

/// Approach proportional gain.
pub const AUTO_APPROACH_KP: f64 = 0.006;

/// Approach integral gain.
pub const AUTO_APPROACH_KI: f64 = 0.000_05;

// ─── Default channels ───────────────────────────────────────────────

pub const PORT_DRIVE_FRONT_LEFT: u8 = 6;
pub const PORT_DRIVE_REAR_LEFT: u8 = 8;
pub const PORT_DRIVE_FRONT_RIGHT: u8 = 7;
pub const PORT_DRIVE_REAR_RIGHT: u8 = 3;
pub const PORT_CATAPULT_MOTOR_ONE: u8 = 4;
pub const PORT_CATAPULT_MOTOR_TWO: u8 = 5;
pub const PORT_COLLECTOR_LIFT: u8 = 1;
pub const PORT_COLLECTOR_ROLLER: u8 = 2;
pub const PORT_CATAPULT_ENCODER: u8 = 5;
pub const PORT_LOWER_LIMIT: u8 = 3;
pub const PORT_BALL_SENSOR: u8 = 7;
pub const PORT_RANGE_SENSOR: u8 = 1;
pub const PORT_GYRO: u8 = 2;

/// Number of channels per I/O class on the controller.
pub const MAX_CHANNELS: usize = 16;

/// Number of axes on the driver joystick.
pub const MAX_AXES: usize = 8;

/// Number of buttons on the driver joystick.
pub const MAX_BUTTONS: usize = 16;

/// Number of diagnostic display lines.
pub const DISPLAY_LINES: usize = 6;

/// Characters per diagnostic display line.
pub const DISPLAY_LINE_WIDTH: usize = 32;

const_assert!(CATAPULT_AUTO_LOWERING_TIME < CATAPULT_LOWERING_TIME);
const_assert!(COLLECTOR_SETTLE_TIME < COLLECTOR_RAISE_TIME);
const_assert!(AUTO_COLLECTOR_LOWER_TIME < AUTO_UNFOLDING_DONE_TIME);
const_assert!(AUTO_UNFOLDING_DONE_TIME < AUTO_FIRE_TIME);
const_assert!((PORT_DRIVE_REAR_LEFT as usize) < MAX_CHANNELS);
