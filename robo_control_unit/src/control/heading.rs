//! PI heading-hold corrector.
//!
//! Converts a signed heading error into a rotation command that turns the
//! chassis back toward the held heading while the driver translates. The
//! integral term accumulates only while the driver's X/Y stick is steady;
//! any stick movement beyond [`HEADING_JOYSTICK_DEADBAND`] between two
//! samples clears it.
//!
//! Output per call:
//!
//! ```text
//! |out| = |e|·Kp + Σ|e|·Ki·dt        sign(out) = −sign(e),  out = 0 when e = 0
//! ```

use std::time::Duration;

use robo_common::config::HeadingGains;
use robo_common::consts::HEADING_JOYSTICK_DEADBAND;
use robo_common::hal::clock::SharedClock;

/// Heading corrector memory.
pub struct HeadingCorrector {
    clock: SharedClock,
    prev_x: f64,
    prev_y: f64,
    /// Timestamp of the previous call; `None` after `reinit()`.
    prev_time: Option<Duration>,
    cumulative_error: f64,
}

impl HeadingCorrector {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            prev_x: 0.0,
            prev_y: 0.0,
            prev_time: None,
            cumulative_error: 0.0,
        }
    }

    /// Clear the integral and the time marker; the next call uses dt = 0.
    pub fn reinit(&mut self) {
        self.cumulative_error = 0.0;
        self.prev_time = None;
    }

    #[inline]
    pub fn cumulative_error(&self) -> f64 {
        self.cumulative_error
    }

    /// Compute the rotation command for this cycle.
    ///
    /// `heading_error` is the signed gyro reading relative to the held
    /// heading [deg].
    pub fn update(&mut self, x: f64, y: f64, heading_error: f64, gains: &HeadingGains) -> f64 {
        let magnitude = heading_error.abs();
        let now = self.clock.now();
        let dt = self
            .prev_time
            .map_or(0.0, |prev| now.saturating_sub(prev).as_secs_f64());

        let resteering = (x - self.prev_x).abs() > HEADING_JOYSTICK_DEADBAND
            || (y - self.prev_y).abs() > HEADING_JOYSTICK_DEADBAND;
        if resteering {
            self.cumulative_error = 0.0;
        } else {
            self.cumulative_error += magnitude;
        }

        let correction = magnitude * gains.kp + self.cumulative_error * gains.ki * dt;
        let output = if heading_error > 0.0 {
            -correction
        } else if heading_error < 0.0 {
            correction
        } else {
            0.0
        };

        self.prev_x = x;
        self.prev_y = y;
        self.prev_time = Some(now);
        output
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
