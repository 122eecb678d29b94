//! Mode transitions, disabled safety, pit test mode and a full scheduled
//! match through the cycle runner.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use robo_common::control_unit::state::{
    ApproachPhase, CatapultPhase, CollectorMode, RobotMode, UnfoldingPhase,
};
use robo_common::hal::clock::SharedClock;
use robo_control_unit::config::load_config_from_str;
use robo_control_unit::cycle::{CycleRunner, MatchSchedule, Pacing};
use robo_hal::{PlantLink, SimClock, SimulationDriver};

use super::rig::{GOOD_GAINS, Rig};

const LIFT: u8 = 1;
const FIRE: u8 = 1;
const PRESET_151: u8 = 6;

#[test]
fn disabled_forces_safe_outputs_and_ignores_driver() {
    let mut rig = Rig::builder().gains(GOOD_GAINS).build();
    rig.enter(RobotMode::Teleop);
    rig.press(PRESET_151);
    rig.probe.set_axis(2, -1.0);
    rig.cycle();
    assert_eq!(rig.robot.catapult().stopping_point(), 151);
    assert_ne!(rig.drive_powers(), [0.0; 4]);

    rig.press(FIRE);
    rig.cycle();
    assert_eq!(rig.robot.catapult().phase(), CatapultPhase::Firing);

    rig.enter(RobotMode::Disabled);
    assert_eq!(rig.robot.catapult().phase(), CatapultPhase::Idle);
    rig.cycles(3);
    assert_eq!(rig.robot.catapult().phase(), CatapultPhase::Idle);
    assert_eq!(rig.robot.catapult().stopping_point(), 140);
    assert_eq!(rig.robot.collector().mode(), CollectorMode::Disabled);
    assert_eq!(rig.drive_powers(), [0.0; 4]);
    assert_eq!(rig.catapult_power(), 0.0);
}

#[test]
fn disabled_stops_autonomous_timer() {
    let mut rig = Rig::builder().start_range(300.0).build();
    rig.enter(RobotMode::Autonomous);
    rig.run_for(2.0);
    rig.enter(RobotMode::Disabled);
    let frozen = rig.robot.autonomous_elapsed();
    rig.run_for(1.0);
    assert_eq!(rig.robot.autonomous_elapsed(), frozen);
}

#[test]
fn autonomous_entry_rearms_sequences() {
    let mut rig = Rig::builder().start_range(300.0).build();
    rig.enter(RobotMode::Autonomous);
    rig.run_for(8.0);
    assert!(rig.robot.approach().fired());
    assert!(rig.robot.unfolding().is_done());

    rig.enter(RobotMode::Disabled);
    rig.cycle();
    rig.probe.set_encoder(5, 42.0);
    rig.enter(RobotMode::Autonomous);
    assert_eq!(rig.robot.unfolding().phase(), UnfoldingPhase::LowerCollector);
    assert_eq!(rig.robot.approach().phase(), ApproachPhase::Waiting);
    assert!(!rig.robot.approach().fired());
    assert_eq!(rig.robot.approach().cumulative_error(), 0.0);
    assert_eq!(rig.robot.autonomous_elapsed(), 0.0);
    assert_eq!(rig.robot.catapult().encoder_count(), 0);
    assert!(rig.robot.collector().mode().is_automatic());
}

#[test]
fn test_mode_raises_collector_for_stowing() {
    let mut rig = Rig::builder().build();
    rig.enter(RobotMode::Teleop);
    rig.press(FIRE);
    rig.probe.set_axis(2, -1.0);
    rig.cycle();
    rig.release(FIRE);

    rig.enter(RobotMode::Test);
    rig.cycle();
    assert_eq!(rig.robot.catapult().phase(), CatapultPhase::Idle);
    assert_eq!(rig.catapult_power(), 0.0);
    assert_eq!(rig.drive_powers(), [0.0; 4]);
    assert_eq!(rig.probe.motor_power(LIFT), 0.3);
    assert_eq!(rig.robot.collector().mode(), CollectorMode::Disabled);

    rig.cycles(10);
    assert_eq!(rig.probe.motor_power(LIFT), 0.3);
}

#[test]
fn scheduled_match_runs_end_to_end() {
    let gains = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(gains.path(), GOOD_GAINS).unwrap();
    let config = load_config_from_str("")
        .unwrap()
        .with_gains_path(gains.path())
        .unwrap();
    let ports = config.robot.ports.clone();

    let mut hal = SimulationDriver::new();
    hal.add_link(PlantLink::EncoderFromMotor {
        motor: ports.catapult_motor_one,
        encoder: ports.catapult_encoder,
        clicks_per_second: 600.0,
    })
    .unwrap();
    hal.add_link(PlantLink::AnalogFromMotor {
        motor: ports.drive_front_left,
        analog: ports.range_sensor,
        units_per_second: 40.0,
    })
    .unwrap();
    let probe = hal.probe();
    probe.set_analog(ports.range_sensor, 420.0);

    let sim = Arc::new(SimClock::new());
    let clock: SharedClock = sim.clone();
    let schedule = MatchSchedule::standard();
    let total = schedule.total_duration();
    let mut runner =
        CycleRunner::new(&config, hal, Box::new(schedule), clock, Pacing::Simulated(sim))
            .unwrap();

    let running = AtomicBool::new(true);
    let period = runner.period();
    let cycles = (total + Duration::from_secs(1)).as_millis() as u64 / period.as_millis() as u64;
    let stats = runner.run(Some(cycles), &running);
    assert_eq!(stats.cycle_count, cycles);

    let robot = runner.robot();
    assert_eq!(robot.mode(), RobotMode::Disabled);
    assert!(robot.approach().fired());
    assert!(robot.unfolding().is_done());
    assert!(robot.heading_gains().is_some());
    assert_eq!(robot.catapult().stopping_point(), 140);
    assert_eq!(probe.display_line(0), "Mode: Disabled");
}
