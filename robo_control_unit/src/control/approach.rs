//! Range approach controller for the autonomous drive-up.
//!
//! PI on the range-sensor reading: while the reading is above the standoff
//! distance the drive moves forward at
//! `−(error·Kp + Σerror·Ki)` on the joystick Y axis (negative Y is forward).
//! The integrator is never reset within a run and, unless a limit is
//! configured, never clamped.

use robo_common::control_unit::config::AutonomousConfig;

#[derive(Debug, Clone)]
pub struct RangeApproach {
    standoff: i32,
    kp: f64,
    ki: f64,
    integral_limit: Option<f64>,
    /// Sum of range errors since the last reset [raw units].
    cumulative_error: f64,
}

impl RangeApproach {
    pub fn new(config: &AutonomousConfig) -> Self {
        Self {
            standoff: config.standoff_distance,
            kp: config.approach_kp,
            ki: config.approach_ki,
            integral_limit: config.integral_limit,
            cumulative_error: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.cumulative_error = 0.0;
    }

    #[inline]
    pub fn cumulative_error(&self) -> f64 {
        self.cumulative_error
    }

    /// Forward command for this range reading, or `None` once within the
    /// standoff distance.
    pub fn update(&mut self, range: i32) -> Option<f64> {
        if range <= self.standoff {
            return None;
        }
        let error = f64::from(range - self.standoff);
        self.cumulative_error += error;
        if let Some(limit) = self.integral_limit {
            self.cumulative_error = self.cumulative_error.clamp(-limit, limit);
        }
        Some(-(error * self.kp + self.cumulative_error * self.ki))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
