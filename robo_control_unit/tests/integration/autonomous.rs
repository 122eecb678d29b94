//! Autonomous routine against the simulated plant.
//!
//! The catapult encoder follows the catapult motor and the range reading
//! closes while the drive moves forward, so the sequences run on their own
//! sensor feedback.

use robo_common::control_unit::config::RobotConfig;
use robo_common::control_unit::state::{
    ApproachPhase, CatapultPhase, CollectorMode, RobotMode, UnfoldingPhase,
};

use super::rig::Rig;

const RANGE: u8 = 1;

fn plant_rig() -> Rig {
    Rig::builder()
        .catapult_plant(600.0)
        .range_plant(40.0)
        .start_range(420.0)
        .build()
}

#[test]
fn unfolds_approaches_and_fires() {
    let mut rig = plant_rig();
    rig.enter(RobotMode::Autonomous);
    assert!(rig.robot.collector().mode().is_automatic());

    // Opening hold.
    rig.run_for(0.9);
    assert_eq!(rig.robot.approach().phase(), ApproachPhase::Waiting);
    assert_eq!(rig.drive_powers(), [0.0; 4]);
    assert_eq!(rig.probe.analog(RANGE), 420.0);

    // Approach under way.
    rig.run_for(0.2);
    assert_eq!(rig.robot.approach().phase(), ApproachPhase::Running);
    let powers = rig.drive_powers();
    assert!(powers[0] > 0.0);
    assert!(powers[2] < 0.0, "right side is inverted");
    assert!(rig.probe.analog(RANGE) < 420.0);

    // Catapult unfolding lower.
    rig.run_for(0.5);
    assert_eq!(rig.robot.unfolding().phase(), UnfoldingPhase::AwaitCompletion);
    assert_eq!(rig.robot.catapult().phase(), CatapultPhase::AutoLowering);
    assert_eq!(rig.catapult_power(), -0.3);

    rig.cycle_until(200, |r| r.unfolding().is_done()).unwrap();
    assert!(rig.robot.autonomous_elapsed() >= 4.0);
    assert_eq!(rig.robot.collector().mode(), CollectorMode::Disabled);
    assert_eq!(rig.robot.catapult().phase(), CatapultPhase::Idle);
    assert!(!rig.robot.approach().fired());

    rig.cycle_until(200, |r| r.approach().fired()).unwrap();
    assert!(rig.robot.autonomous_elapsed() > 7.0);
    assert_eq!(rig.robot.catapult().phase(), CatapultPhase::Firing);
    assert_eq!(rig.robot.catapult().stopping_point(), 151);
    assert_eq!(rig.drive_powers(), [0.0; 4]);
    assert_eq!(rig.catapult_power(), 1.0);
    assert!(rig.probe.analog(RANGE) > 95.0);

    rig.cycle_until(50, |r| r.catapult().phase() == CatapultPhase::Lowering)
        .unwrap();
    assert!(rig.robot.catapult().encoder_count() >= 151);
    assert_eq!(rig.catapult_power(), 0.0);

    // One shot per autonomous period.
    rig.run_for(2.0);
    assert!(rig.robot.approach().fired());
    assert_ne!(rig.robot.catapult().phase(), CatapultPhase::Firing);
}

#[test]
fn shot_waits_for_unfolding() {
    let mut config = RobotConfig::default();
    config.autonomous.fire_time = 2.0;
    let mut rig = Rig::builder()
        .config(config)
        .range_plant(40.0)
        .start_range(420.0)
        .build();
    rig.enter(RobotMode::Autonomous);

    rig.run_for(3.0);
    assert!(!rig.robot.approach().fired());
    assert_eq!(rig.robot.approach().phase(), ApproachPhase::Running);

    rig.cycle_until(100, |r| r.approach().fired()).unwrap();
    assert!(rig.robot.unfolding().is_done());
    assert!(rig.robot.autonomous_elapsed() >= 4.0);
}

#[test]
fn reaching_standoff_before_fire_time_never_fires() {
    let mut rig = Rig::builder().start_range(90.0).build();
    rig.enter(RobotMode::Autonomous);

    let mut fired_at_any_point = false;
    for _ in 0..500 {
        rig.cycle();
        fired_at_any_point |= rig.robot.catapult().phase() == CatapultPhase::Firing;
    }
    assert_eq!(rig.robot.approach().phase(), ApproachPhase::Stopped);
    assert!(!rig.robot.approach().fired());
    assert!(!fired_at_any_point);
    assert!(rig.robot.unfolding().is_done());
    assert_eq!(rig.drive_powers(), [0.0; 4]);
}

#[test]
fn integral_limit_bounds_approach_integrator() {
    let mut config = RobotConfig::default();
    config.autonomous.integral_limit = Some(1000.0);
    let mut rig = Rig::builder().config(config).start_range(300.0).build();
    rig.enter(RobotMode::Autonomous);

    rig.run_for(3.0);
    assert_eq!(rig.robot.approach().cumulative_error(), 1000.0);

    let mut unbounded = Rig::builder().start_range(300.0).build();
    unbounded.enter(RobotMode::Autonomous);
    unbounded.run_for(3.0);
    assert!(unbounded.robot.approach().cumulative_error() > 1000.0);
}

#[test]
fn diagnostics_follow_autonomous_progress() {
    let mut rig = plant_rig();
    rig.enter(RobotMode::Autonomous);
    rig.run_for(4.1);
    assert_eq!(rig.probe.display_line(0), "Mode: Auto");
    assert_eq!(rig.probe.display_line(4), "Unfold: Done");
    assert!(rig.probe.display_line(5).starts_with("Appr: Running"));
}
