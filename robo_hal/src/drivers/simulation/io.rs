//! Simulated I/O bank and channel handles.
//!
//! All channel values live in one [`IoBank`] shared between the handles
//! owned by the control unit and the [`SimProbe`](super::SimProbe) used by
//! tests to drive inputs and observe outputs.

use std::sync::Arc;

use parking_lot::Mutex;
use robo_common::consts::{DISPLAY_LINE_WIDTH, DISPLAY_LINES, MAX_AXES, MAX_BUTTONS, MAX_CHANNELS};
use robo_common::hal::driver::{
    AnalogInput, DiagnosticDisplay, DigitalInput, EncoderInput, GyroInput, InputDevice,
    MotorOutput,
};
use tracing::trace;

/// Fixed-capacity text of one display line.
pub type DisplayText = heapless::String<DISPLAY_LINE_WIDTH>;

/// Complete simulated I/O state.
///
/// Encoders and analog channels are stored as `f64` so plant links can
/// accumulate fractional motion between cycles; handles expose them as
/// integers like the real hardware.
#[derive(Debug, Clone)]
pub struct IoBank {
    pub motors: [f64; MAX_CHANNELS],
    pub encoders: [f64; MAX_CHANNELS],
    pub digital: [bool; MAX_CHANNELS],
    pub analog: [f64; MAX_CHANNELS],
    pub gyro: [f64; MAX_CHANNELS],
    /// Index 0 unused; axes are 1-based.
    pub axes: [f64; MAX_AXES + 1],
    /// Index 0 unused; buttons are 1-based.
    pub buttons: [bool; MAX_BUTTONS + 1],
    pub display: [DisplayText; DISPLAY_LINES],
}

impl Default for IoBank {
    fn default() -> Self {
        Self {
            motors: [0.0; MAX_CHANNELS],
            encoders: [0.0; MAX_CHANNELS],
            digital: [false; MAX_CHANNELS],
            analog: [0.0; MAX_CHANNELS],
            gyro: [0.0; MAX_CHANNELS],
            axes: [0.0; MAX_AXES + 1],
            buttons: [false; MAX_BUTTONS + 1],
            display: core::array::from_fn(|_| DisplayText::new()),
        }
    }
}

pub type SharedBank = Arc<Mutex<IoBank>>;

// ─── Channel Handles ────────────────────────────────────────────────

/// Motor output; clamps commands to [-1, 1] like a motor controller.
pub struct SimMotor {
    pub(crate) bank: SharedBank,
    pub(crate) channel: usize,
}

impl MotorOutput for SimMotor {
    fn set_power(&mut self, value: f64) {
        let clamped = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) };
        self.bank.lock().motors[self.channel] = clamped;
    }
}

pub struct SimEncoder {
    pub(crate) bank: SharedBank,
    pub(crate) channel: usize,
}

impl EncoderInput for SimEncoder {
    fn count(&self) -> i32 {
        self.bank.lock().encoders[self.channel].trunc() as i32
    }

    fn reset(&mut self) {
        self.bank.lock().encoders[self.channel] = 0.0;
    }
}

pub struct SimDigital {
    pub(crate) bank: SharedBank,
    pub(crate) channel: usize,
}

impl DigitalInput for SimDigital {
    fn state(&self) -> bool {
        self.bank.lock().digital[self.channel]
    }
}

pub struct SimAnalog {
    pub(crate) bank: SharedBank,
    pub(crate) channel: usize,
}

impl AnalogInput for SimAnalog {
    fn value(&self) -> i32 {
        self.bank.lock().analog[self.channel].round() as i32
    }
}

pub struct SimGyro {
    pub(crate) bank: SharedBank,
    pub(crate) channel: usize,
}

impl GyroInput for SimGyro {
    fn angle(&self) -> f64 {
        self.bank.lock().gyro[self.channel]
    }

    fn reset(&mut self) {
        self.bank.lock().gyro[self.channel] = 0.0;
    }
}

pub struct SimJoystick {
    pub(crate) bank: SharedBank,
}

impl InputDevice for SimJoystick {
    fn axis(&self, index: u8) -> f64 {
        let index = index as usize;
        if index == 0 || index > MAX_AXES {
            return 0.0;
        }
        self.bank.lock().axes[index]
    }

    fn button(&self, index: u8) -> bool {
        let index = index as usize;
        if index == 0 || index > MAX_BUTTONS {
            return false;
        }
        self.bank.lock().buttons[index]
    }
}

/// Display that keeps the last text of every line.
pub struct SimDisplay {
    pub(crate) bank: SharedBank,
}

impl DiagnosticDisplay for SimDisplay {
    fn write_line(&mut self, line: usize, text: &str) {
        if line >= DISPLAY_LINES {
            return;
        }
        let mut stored = DisplayText::new();
        for ch in text.chars() {
            if stored.push(ch).is_err() {
                break;
            }
        }
        trace!(line, text = stored.as_str(), "display");
        self.bank.lock().display[line] = stored;
    }
}
