//! Shared test rig: a robot on the simulation HAL with a simulated clock.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use robo_common::prelude::*;
use robo_control_unit::orchestrator::Robot;
use robo_hal::{PlantLink, SimClock, SimProbe, SimulationDriver};
use tempfile::NamedTempFile;

pub const PERIOD: Duration = DEFAULT_CYCLE_TIME;

pub const GOOD_GAINS: &str = "0.05\n0.0\n0.15\n";

pub struct Rig {
    pub clock: Arc<SimClock>,
    pub hal: SimulationDriver,
    pub probe: SimProbe,
    pub robot: Robot,
    pub config: RobotConfig,
    /// Keeps the gain file alive for the rig's lifetime.
    _gains: Option<NamedTempFile>,
}

pub struct RigBuilder {
    config: RobotConfig,
    gains: Option<String>,
    links: Vec<PlantLink>,
    start_range: f64,
}

impl RigBuilder {
    pub fn config(mut self, config: RobotConfig) -> Self {
        self.config = config;
        self
    }

    /// Write `contents` to a temporary gain file and point teleop at it.
    pub fn gains(mut self, contents: &str) -> Self {
        self.gains = Some(contents.to_string());
        self
    }

    /// Catapult encoder follows the catapult motor.
    pub fn catapult_plant(mut self, clicks_per_second: f64) -> Self {
        let ports = &self.config.ports;
        self.links.push(PlantLink::EncoderFromMotor {
            motor: ports.catapult_motor_one,
            encoder: ports.catapult_encoder,
            clicks_per_second,
        });
        self
    }

    /// Range reading closes while the front-left wheel drives forward.
    pub fn range_plant(mut self, units_per_second: f64) -> Self {
        let ports = &self.config.ports;
        self.links.push(PlantLink::AnalogFromMotor {
            motor: ports.drive_front_left,
            analog: ports.range_sensor,
            units_per_second,
        });
        self
    }

    pub fn start_range(mut self, range: f64) -> Self {
        self.start_range = range;
        self
    }

    pub fn build(self) -> Rig {
        let mut config = self.config;
        let gains_file = self.gains.map(|contents| {
            let mut file = NamedTempFile::new().unwrap();
            file.write_all(contents.as_bytes()).unwrap();
            file
        });
        config.teleop.gains_path = match &gains_file {
            Some(file) => file.path().display().to_string(),
            None => "/nonexistent/heading_gains.txt".to_string(),
        };

        let clock = Arc::new(SimClock::new());
        let mut hal = SimulationDriver::new();
        for link in self.links {
            hal.add_link(link).unwrap();
        }
        let probe = hal.probe();
        probe.set_analog(config.ports.range_sensor, self.start_range);
        let robot = Robot::new(&config, &mut hal, clock.clone()).unwrap();

        Rig {
            clock,
            hal,
            probe,
            robot,
            config,
            _gains: gains_file,
        }
    }
}

impl Rig {
    pub fn builder() -> RigBuilder {
        RigBuilder {
            config: RobotConfig::default(),
            gains: None,
            links: Vec::new(),
            start_range: 0.0,
        }
    }

    pub fn enter(&mut self, mode: RobotMode) {
        self.robot.enter(mode);
    }

    /// One control period: periodic hook, plant step, clock advance.
    pub fn cycle(&mut self) {
        self.robot.periodic();
        self.hal.step(PERIOD);
        self.clock.advance(PERIOD);
    }

    pub fn cycles(&mut self, n: usize) {
        for _ in 0..n {
            self.cycle();
        }
    }

    /// Run until `secs` of simulated time have passed.
    pub fn run_for(&mut self, secs: f64) {
        let n = (secs / PERIOD.as_secs_f64()).round() as usize;
        self.cycles(n);
    }

    /// Cycle until `done` holds, at most `limit` cycles. Returns the number
    /// of cycles run, or `None` if the limit was hit.
    pub fn cycle_until(&mut self, limit: usize, mut done: impl FnMut(&Robot) -> bool) -> Option<usize> {
        for n in 1..=limit {
            self.cycle();
            if done(&self.robot) {
                return Some(n);
            }
        }
        None
    }

    /// Powers of the four drive motors as written, in FL, RL, FR, RR order.
    pub fn drive_powers(&self) -> [f64; 4] {
        let p = &self.config.ports;
        [
            self.probe.motor_power(p.drive_front_left),
            self.probe.motor_power(p.drive_rear_left),
            self.probe.motor_power(p.drive_front_right),
            self.probe.motor_power(p.drive_rear_right),
        ]
    }

    pub fn catapult_power(&self) -> f64 {
        self.probe.motor_power(self.config.ports.catapult_motor_one)
    }

    pub fn press(&self, button: u8) {
        self.probe.set_button(button, true);
    }

    pub fn release(&self, button: u8) {
        self.probe.set_button(button, false);
    }
}
