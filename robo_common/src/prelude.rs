//! Prelude module for common re-exports.
//!
//! ```rust
//! use robo_common::prelude::*;
//! ```

use std::time::Duration;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, HeadingGains, LogLevel, SharedConfig};
pub use crate::control_unit::config::RobotConfig;

// ─── State ──────────────────────────────────────────────────────────
pub use crate::control_unit::state::{
    ApproachPhase, CatapultPhase, CollectorMode, CollectorSubstate, RobotMode, UnfoldingPhase,
};

// ─── HAL ────────────────────────────────────────────────────────────
pub use crate::hal::clock::{Clock, SharedClock};
pub use crate::hal::driver::{
    AnalogInput, DiagnosticDisplay, DigitalInput, EncoderInput, GyroInput, HalDriver, HalError,
    InputDevice, MotorOutput,
};

/// Default control period as Duration.
pub const DEFAULT_CYCLE_TIME: Duration = Duration::from_millis(crate::consts::CYCLE_TIME_MS);
