//! HAL channel traits, driver trait and error types.
//!
//! This module defines:
//! - One trait per I/O class (motor output, encoder, digital, analog, gyro,
//!   driver input device, diagnostic display)
//! - `HalDriver` - the backend that hands out exclusive channel handles
//! - `HalError` - error types for HAL operations
//!
//! All channel operations are infallible and non-blocking: they run inside
//! the control cycle. Only channel claiming can fail.

use std::time::Duration;
use thiserror::Error;

/// Error types for HAL operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HalError {
    /// Channel number outside the backend's range.
    #[error("{class} channel {channel} does not exist")]
    InvalidChannel { class: &'static str, channel: u8 },

    /// Output or counter channel already owned by another component.
    #[error("{class} channel {channel} is already in use")]
    ChannelInUse { class: &'static str, channel: u8 },
}

/// Motor controller output. `value` is nominally in [-1, 1]; clamping of
/// out-of-range values is the implementation's responsibility.
pub trait MotorOutput {
    /// Fire-and-forget power command.
    fn set_power(&mut self, value: f64);
}

/// Quadrature encoder.
pub trait EncoderInput {
    /// Accumulated count [clicks].
    fn count(&self) -> i32;
    /// Zero the accumulated count.
    fn reset(&mut self);
}

/// Digital sensor (limit switch, beam break).
pub trait DigitalInput {
    fn state(&self) -> bool;
}

/// Analog sensor, raw unscaled units (0–1023 range).
pub trait AnalogInput {
    fn value(&self) -> i32;
}

/// Rate gyro integrated to a heading.
pub trait GyroInput {
    /// Signed heading change since the last reset [deg].
    fn angle(&self) -> f64;
    /// Make the current heading the new reference.
    fn reset(&mut self);
}

/// Driver joystick. Axis and button numbers are 1-based.
pub trait InputDevice {
    /// Axis position in [-1, 1]; 0.0 for an unknown axis.
    fn axis(&self, index: u8) -> f64;
    /// Button state; `false` for an unknown button.
    fn button(&self, index: u8) -> bool;
}

/// Line-addressed text display. Write-only and best-effort.
pub trait DiagnosticDisplay {
    fn write_line(&mut self, line: usize, text: &str);
}

/// Trait defining the interface for HAL backends.
///
/// The control unit claims every channel once at startup; each channel
/// handle is then owned by exactly one component for the robot's lifetime.
///
/// # Lifecycle
///
/// 1. Channel claims - before the cycle loop starts
/// 2. `step()` - once per cycle, after the robot tick
pub trait HalDriver {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Returns the driver's semantic version.
    fn version(&self) -> &'static str;

    fn motor(&mut self, channel: u8) -> Result<Box<dyn MotorOutput>, HalError>;
    fn encoder(&mut self, channel: u8) -> Result<Box<dyn EncoderInput>, HalError>;
    fn digital_input(&mut self, channel: u8) -> Result<Box<dyn DigitalInput>, HalError>;
    fn analog_input(&mut self, channel: u8) -> Result<Box<dyn AnalogInput>, HalError>;
    fn gyro(&mut self, channel: u8) -> Result<Box<dyn GyroInput>, HalError>;
    fn input_device(&mut self) -> Result<Box<dyn InputDevice>, HalError>;
    fn display(&mut self) -> Result<Box<dyn DiagnosticDisplay>, HalError>;

    /// Refresh inputs for the coming cycle.
    ///
    /// # Arguments
    /// * `dt` - Elapsed time since the previous step
    fn step(&mut self, dt: Duration);
}
