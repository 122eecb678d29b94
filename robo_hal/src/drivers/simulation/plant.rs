//! Plant models linking motor outputs to sensor readings.
//!
//! Each link is a first-order rate model integrated once per `step(dt)`:
//! the linked sensor moves by `power × rate × dt`.

use super::io::IoBank;

/// One motor → sensor coupling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlantLink {
    /// Encoder counts up at `clicks_per_second` at full motor power.
    EncoderFromMotor {
        motor: u8,
        encoder: u8,
        clicks_per_second: f64,
    },
    /// Analog reading decreases at `units_per_second` at full forward power
    /// (a range sensor closing on a wall).
    AnalogFromMotor {
        motor: u8,
        analog: u8,
        units_per_second: f64,
    },
}

impl PlantLink {
    /// Integrate this link over `dt_secs`.
    pub(crate) fn apply(&self, bank: &mut IoBank, dt_secs: f64) {
        match *self {
            PlantLink::EncoderFromMotor {
                motor,
                encoder,
                clicks_per_second,
            } => {
                let power = bank.motors[motor as usize];
                bank.encoders[encoder as usize] += power * clicks_per_second * dt_secs;
            }
            PlantLink::AnalogFromMotor {
                motor,
                analog,
                units_per_second,
            } => {
                let power = bank.motors[motor as usize];
                let next = bank.analog[analog as usize] - power * units_per_second * dt_secs;
                bank.analog[analog as usize] = next.max(0.0);
            }
        }
    }

    /// Highest channel index this link touches.
    pub(crate) fn max_channel(&self) -> u8 {
        match *self {
            PlantLink::EncoderFromMotor { motor, encoder, .. } => motor.max(encoder),
            PlantLink::AnalogFromMotor { motor, analog, .. } => motor.max(analog),
        }
    }
}
