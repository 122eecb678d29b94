//! Simulation driver implementation.
//!
//! The `SimulationDriver` implements the `HalDriver` trait over an in-memory
//! [`IoBank`]. Output and counter channels are claimed exclusively; sensor
//! channels may be shared. Plant links integrate motor outputs into sensor
//! readings on every `step()`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use robo_common::consts::{DISPLAY_LINES, MAX_AXES, MAX_BUTTONS, MAX_CHANNELS};
use robo_common::hal::driver::{
    AnalogInput, DiagnosticDisplay, DigitalInput, EncoderInput, GyroInput, HalDriver, HalError,
    InputDevice, MotorOutput,
};
use tracing::{debug, info, trace};

use super::io::{
    IoBank, SharedBank, SimAnalog, SimDigital, SimDisplay, SimEncoder, SimGyro, SimJoystick,
    SimMotor,
};
use super::plant::PlantLink;

/// Simulation driver implementing the HalDriver trait.
pub struct SimulationDriver {
    name: &'static str,
    version: &'static str,
    bank: SharedBank,
    /// Claim flags for exclusively owned channels.
    motors_claimed: [bool; MAX_CHANNELS],
    encoders_claimed: [bool; MAX_CHANNELS],
    gyros_claimed: [bool; MAX_CHANNELS],
    links: Vec<PlantLink>,
    /// Total simulated time stepped so far.
    sim_time: Duration,
}

impl SimulationDriver {
    /// Create a new simulation driver with all channels at rest.
    pub fn new() -> Self {
        Self {
            name: "simulation",
            version: env!("CARGO_PKG_VERSION"),
            bank: Arc::new(Mutex::new(IoBank::default())),
            motors_claimed: [false; MAX_CHANNELS],
            encoders_claimed: [false; MAX_CHANNELS],
            gyros_claimed: [false; MAX_CHANNELS],
            links: Vec::new(),
            sim_time: Duration::ZERO,
        }
    }

    /// Register a plant link.
    ///
    /// # Errors
    ///
    /// `InvalidChannel` if the link names a channel outside the bank.
    pub fn add_link(&mut self, link: PlantLink) -> Result<(), HalError> {
        let highest = link.max_channel();
        if highest as usize >= MAX_CHANNELS {
            return Err(HalError::InvalidChannel {
                class: "plant link",
                channel: highest,
            });
        }
        debug!(?link, "Plant link registered");
        self.links.push(link);
        Ok(())
    }

    /// Test and scenario access to the I/O bank.
    pub fn probe(&self) -> SimProbe {
        SimProbe {
            bank: Arc::clone(&self.bank),
        }
    }

    /// Total simulated time stepped so far.
    pub fn sim_time(&self) -> Duration {
        self.sim_time
    }

    fn check_channel(class: &'static str, channel: u8) -> Result<usize, HalError> {
        let index = channel as usize;
        if index >= MAX_CHANNELS {
            return Err(HalError::InvalidChannel { class, channel });
        }
        Ok(index)
    }

    fn claim(
        claimed: &mut [bool; MAX_CHANNELS],
        class: &'static str,
        channel: u8,
    ) -> Result<usize, HalError> {
        let index = Self::check_channel(class, channel)?;
        if claimed[index] {
            return Err(HalError::ChannelInUse { class, channel });
        }
        claimed[index] = true;
        trace!(class, channel, "Channel claimed");
        Ok(index)
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HalDriver for SimulationDriver {
    fn name(&self) -> &'static str {
        self.name
    }

    fn version(&self) -> &'static str {
        self.version
    }

    fn motor(&mut self, channel: u8) -> Result<Box<dyn MotorOutput>, HalError> {
        let channel = Self::claim(&mut self.motors_claimed, "motor", channel)?;
        Ok(Box::new(SimMotor {
            bank: Arc::clone(&self.bank),
            channel,
        }))
    }

    fn encoder(&mut self, channel: u8) -> Result<Box<dyn EncoderInput>, HalError> {
        let channel = Self::claim(&mut self.encoders_claimed, "encoder", channel)?;
        Ok(Box::new(SimEncoder {
            bank: Arc::clone(&self.bank),
            channel,
        }))
    }

    fn digital_input(&mut self, channel: u8) -> Result<Box<dyn DigitalInput>, HalError> {
        let channel = Self::check_channel("digital input", channel)?;
        Ok(Box::new(SimDigital {
            bank: Arc::clone(&self.bank),
            channel,
        }))
    }

    fn analog_input(&mut self, channel: u8) -> Result<Box<dyn AnalogInput>, HalError> {
        let channel = Self::check_channel("analog input", channel)?;
        Ok(Box::new(SimAnalog {
            bank: Arc::clone(&self.bank),
            channel,
        }))
    }

    fn gyro(&mut self, channel: u8) -> Result<Box<dyn GyroInput>, HalError> {
        let channel = Self::claim(&mut self.gyros_claimed, "gyro", channel)?;
        Ok(Box::new(SimGyro {
            bank: Arc::clone(&self.bank),
            channel,
        }))
    }

    fn input_device(&mut self) -> Result<Box<dyn InputDevice>, HalError> {
        Ok(Box::new(SimJoystick {
            bank: Arc::clone(&self.bank),
        }))
    }

    fn display(&mut self) -> Result<Box<dyn DiagnosticDisplay>, HalError> {
        info!(lines = DISPLAY_LINES, "Simulated diagnostic display attached");
        Ok(Box::new(SimDisplay {
            bank: Arc::clone(&self.bank),
        }))
    }

    fn step(&mut self, dt: Duration) {
        let dt_secs = dt.as_secs_f64();
        let mut bank = self.bank.lock();
        for link in &self.links {
            link.apply(&mut bank, dt_secs);
        }
        self.sim_time += dt;
    }
}

// ─── Probe ──────────────────────────────────────────────────────────

/// Handle for driving simulated inputs and reading back outputs.
///
/// Cloned from the driver; shares the same I/O bank as the channel handles.
#[derive(Clone)]
pub struct SimProbe {
    bank: SharedBank,
}

impl SimProbe {
    pub fn set_digital(&self, channel: u8, state: bool) {
        if let Some(slot) = self.bank.lock().digital.get_mut(channel as usize) {
            *slot = state;
        }
    }

    pub fn set_analog(&self, channel: u8, value: f64) {
        if let Some(slot) = self.bank.lock().analog.get_mut(channel as usize) {
            *slot = value;
        }
    }

    pub fn analog(&self, channel: u8) -> f64 {
        self.bank.lock().analog.get(channel as usize).copied().unwrap_or(0.0)
    }

    pub fn set_encoder(&self, channel: u8, count: f64) {
        if let Some(slot) = self.bank.lock().encoders.get_mut(channel as usize) {
            *slot = count;
        }
    }

    pub fn encoder(&self, channel: u8) -> f64 {
        self.bank.lock().encoders.get(channel as usize).copied().unwrap_or(0.0)
    }

    pub fn set_gyro(&self, channel: u8, angle: f64) {
        if let Some(slot) = self.bank.lock().gyro.get_mut(channel as usize) {
            *slot = angle;
        }
    }

    pub fn gyro(&self, channel: u8) -> f64 {
        self.bank.lock().gyro.get(channel as usize).copied().unwrap_or(0.0)
    }

    /// Set a 1-based joystick axis; out-of-range indices are ignored.
    pub fn set_axis(&self, index: u8, value: f64) {
        let index = index as usize;
        if (1..=MAX_AXES).contains(&index) {
            self.bank.lock().axes[index] = value;
        }
    }

    /// Set a 1-based joystick button; out-of-range indices are ignored.
    pub fn set_button(&self, index: u8, pressed: bool) {
        let index = index as usize;
        if (1..=MAX_BUTTONS).contains(&index) {
            self.bank.lock().buttons[index] = pressed;
        }
    }

    /// Release every button and center every axis.
    pub fn release_all(&self) {
        let mut bank = self.bank.lock();
        bank.axes = [0.0; MAX_AXES + 1];
        bank.buttons = [false; MAX_BUTTONS + 1];
    }

    /// Last commanded power of a motor channel.
    pub fn motor_power(&self, channel: u8) -> f64 {
        self.bank.lock().motors.get(channel as usize).copied().unwrap_or(0.0)
    }

    /// Last text written to a display line.
    pub fn display_line(&self, line: usize) -> String {
        self.bank
            .lock()
            .display
            .get(line)
            .map(|text| text.as_str().to_string())
            .unwrap_or_default()
    }
}
