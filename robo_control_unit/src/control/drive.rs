//! Mecanum drive base.
//!
//! Joystick-style commands (`x` strafe, `y` forward-negative, `twist`) are
//! mixed into four wheel speeds with the Cartesian mecanum equations,
//! normalized into [-1, 1], and written with the right side inverted.

use robo_common::hal::driver::MotorOutput;

/// Wheel order used by [`mecanum_speeds`] and [`DriveBase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Wheel {
    FrontLeft = 0,
    RearLeft = 1,
    FrontRight = 2,
    RearRight = 3,
}

/// Mix a joystick command into wheel speeds `[FL, RL, FR, RR]`, before
/// right-side inversion. The largest magnitude never exceeds 1.
#[inline]
pub fn mecanum_speeds(x: f64, y: f64, twist: f64) -> [f64; 4] {
    let forward = -y;
    let mut speeds = [
        x + forward + twist,
        -x + forward + twist,
        -x + forward - twist,
        x + forward - twist,
    ];

    let max = speeds.iter().fold(0.0_f64, |m, s| m.max(s.abs()));
    if max > 1.0 {
        for s in &mut speeds {
            *s /= max;
        }
    }
    speeds
}

/// Four-motor holonomic drive.
pub struct DriveBase {
    /// Motors in [`Wheel`] order.
    motors: [Box<dyn MotorOutput>; 4],
    x: f64,
    y: f64,
    twist: f64,
}

impl DriveBase {
    pub fn new(
        front_left: Box<dyn MotorOutput>,
        rear_left: Box<dyn MotorOutput>,
        front_right: Box<dyn MotorOutput>,
        rear_right: Box<dyn MotorOutput>,
    ) -> Self {
        Self {
            motors: [front_left, rear_left, front_right, rear_right],
            x: 0.0,
            y: 0.0,
            twist: 0.0,
        }
    }

    /// Store the command applied by the next `tick()`.
    pub fn set_joystick(&mut self, x: f64, y: f64, twist: f64) {
        self.x = x;
        self.y = y;
        self.twist = twist;
    }

    pub fn stop(&mut self) {
        self.set_joystick(0.0, 0.0, 0.0);
    }

    /// Current `(x, y, twist)` command.
    #[inline]
    pub fn command(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.twist)
    }

    pub fn tick(&mut self) {
        let speeds = mecanum_speeds(self.x, self.y, self.twist);
        for (index, (motor, speed)) in self.motors.iter_mut().zip(speeds).enumerate() {
            let inverted = index == Wheel::FrontRight as usize || index == Wheel::RearRight as usize;
            motor.set_power(if inverted { -speed } else { speed });
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
