//! Driver control: button bindings, manual collector axes, mecanum drive
//! and heading hold.

use robo_common::control_unit::state::{
    CatapultPhase, CollectorMode, CollectorSubstate, RobotMode,
};

use super::rig::{GOOD_GAINS, Rig};

const AXIS_X: u8 = 1;
const AXIS_Y: u8 = 2;
const AXIS_TWIST: u8 = 3;
const AXIS_ROLLER: u8 = 5;
const AXIS_RAISE: u8 = 6;

const FIRE: u8 = 1;
const COLLECTOR_RUN: u8 = 2;
const COLLECTOR_DISABLE: u8 = 3;
const ENCODER_RESET: u8 = 4;
const HEADING_HOLD: u8 = 7;

const GYRO: u8 = 2;
const ENCODER: u8 = 5;
const LIFT: u8 = 1;
const ROLLER: u8 = 2;
const BALL_SENSOR: u8 = 7;

fn teleop_rig() -> Rig {
    let mut rig = Rig::builder().gains(GOOD_GAINS).build();
    rig.enter(RobotMode::Teleop);
    rig
}

#[test]
fn fire_button_runs_shot_to_stopping_point() {
    let mut rig = teleop_rig();
    rig.press(FIRE);
    rig.cycle();
    rig.release(FIRE);
    assert_eq!(rig.robot.catapult().phase(), CatapultPhase::Firing);
    assert_eq!(rig.catapult_power(), 1.0);

    for count in [50.0, 100.0, 139.0] {
        rig.probe.set_encoder(ENCODER, count);
        rig.cycle();
        assert_eq!(rig.robot.catapult().phase(), CatapultPhase::Firing);
    }
    rig.probe.set_encoder(ENCODER, 140.0);
    rig.cycle();
    assert_eq!(rig.robot.catapult().phase(), CatapultPhase::Lowering);
    assert_eq!(rig.catapult_power(), 0.0);

    rig.cycle();
    assert_eq!(rig.catapult_power(), -0.07);

    rig.run_for(1.3);
    assert_eq!(rig.robot.catapult().phase(), CatapultPhase::Idle);
    assert_eq!(rig.probe.encoder(ENCODER), 0.0);
}

#[test]
fn held_fire_button_refires_every_cycle() {
    let mut rig = teleop_rig();
    rig.press(FIRE);
    rig.probe.set_encoder(ENCODER, 500.0);
    rig.cycles(3);
    // Re-entered Firing each cycle, leaving it in the same tick.
    assert_eq!(rig.robot.catapult().phase(), CatapultPhase::Lowering);
    assert_eq!(rig.catapult_power(), 0.0);
}

#[test]
fn preset_buttons_select_stopping_points() {
    let mut rig = teleop_rig();
    for (button, clicks) in [(5, 69), (6, 151), (9, 100), (10, 131)] {
        rig.press(button);
        rig.cycle();
        rig.release(button);
        assert_eq!(rig.robot.catapult().stopping_point(), clicks);
    }

    // Selection persists once released.
    rig.cycles(5);
    assert_eq!(rig.robot.catapult().stopping_point(), 131);
}

#[test]
fn collector_and_encoder_buttons() {
    let mut rig = teleop_rig();

    rig.press(COLLECTOR_RUN);
    rig.cycle();
    rig.release(COLLECTOR_RUN);
    assert!(rig.robot.collector().mode().is_automatic());

    rig.press(COLLECTOR_DISABLE);
    rig.cycle();
    rig.release(COLLECTOR_DISABLE);
    assert_eq!(rig.robot.collector().mode(), CollectorMode::Disabled);

    rig.probe.set_encoder(ENCODER, 77.0);
    rig.press(ENCODER_RESET);
    rig.cycle();
    assert_eq!(rig.robot.catapult().encoder_count(), 0);
}

#[test]
fn collector_runs_full_automatic_cycle() {
    let mut rig = teleop_rig();
    rig.press(COLLECTOR_RUN);
    rig.cycle();
    rig.release(COLLECTOR_RUN);

    // Lower limit open: arm already down, waiting for a ball.
    rig.cycle();
    assert_eq!(rig.probe.motor_power(ROLLER), 1.0);
    assert_eq!(rig.probe.motor_power(LIFT), 0.0);

    rig.probe.set_analog(BALL_SENSOR, 320.0);
    rig.cycle_until(30, |r| {
        r.collector().mode() == CollectorMode::Automatic(CollectorSubstate::Raising)
    })
    .unwrap();
    rig.cycle();
    assert_eq!(rig.probe.motor_power(LIFT), 0.6);
    assert_eq!(rig.probe.motor_power(ROLLER), 1.0);
}

#[test]
fn manual_axes_truncate_toward_zero() {
    let mut rig = teleop_rig();
    rig.probe.set_axis(AXIS_RAISE, 0.9);
    rig.cycle();
    assert_eq!(rig.robot.collector().mode(), CollectorMode::Disabled);

    rig.probe.set_axis(AXIS_RAISE, 1.0);
    rig.cycle();
    assert_eq!(rig.robot.collector().mode(), CollectorMode::ManualRaise);
    assert_eq!(rig.probe.motor_power(LIFT), -0.4);

    rig.probe.set_axis(AXIS_RAISE, -1.0);
    rig.cycle();
    assert_eq!(rig.probe.motor_power(LIFT), 0.45);

    rig.probe.set_axis(AXIS_RAISE, 0.0);
    rig.probe.set_axis(AXIS_ROLLER, -1.0);
    rig.cycle();
    assert_eq!(rig.robot.collector().mode(), CollectorMode::ManualRoller);
    assert_eq!(rig.probe.motor_power(ROLLER), 1.0);
    assert_eq!(rig.probe.motor_power(LIFT), 0.0);
}

#[test]
fn joystick_drives_mecanum_wheels() {
    let mut rig = teleop_rig();
    // Stick forward.
    rig.probe.set_axis(AXIS_Y, -1.0);
    rig.cycle();
    assert_eq!(rig.drive_powers(), [1.0, 1.0, -1.0, -1.0]);

    // Pure strafe right.
    rig.probe.set_axis(AXIS_Y, 0.0);
    rig.probe.set_axis(AXIS_X, 0.5);
    rig.cycle();
    assert_eq!(rig.drive_powers(), [0.5, -0.5, 0.5, -0.5]);

    // Twist passes straight through without heading hold.
    rig.probe.set_axis(AXIS_X, 0.0);
    rig.probe.set_axis(AXIS_TWIST, 0.25);
    rig.cycle();
    assert_eq!(rig.robot.drive().command(), (0.0, 0.0, 0.25));
}

#[test]
fn heading_hold_counters_drift() {
    let mut rig = teleop_rig();
    rig.probe.set_gyro(GYRO, 30.0);
    rig.press(HEADING_HOLD);
    rig.cycle();
    assert!(rig.robot.heading_hold_active());
    // Engaging re-references the gyro.
    assert_eq!(rig.probe.gyro(GYRO), 0.0);
    assert_eq!(rig.robot.drive().command().2, 0.0);

    rig.probe.set_gyro(GYRO, 10.0);
    rig.cycle();
    let twist = rig.robot.drive().command().2;
    assert!((twist + 0.5).abs() < 1e-12, "twist {twist}");

    rig.probe.set_gyro(GYRO, -8.0);
    rig.cycle();
    let twist = rig.robot.drive().command().2;
    assert!((twist - 0.4).abs() < 1e-12, "twist {twist}");

    // Twist beyond the spin threshold hands rotation back to the driver.
    rig.probe.set_axis(AXIS_TWIST, 0.5);
    rig.cycle();
    assert!(!rig.robot.heading_hold_active());
    assert_eq!(rig.robot.drive().command().2, 0.5);

    // Re-engaging holds the current heading.
    rig.probe.set_axis(AXIS_TWIST, 0.0);
    rig.cycle();
    assert!(rig.robot.heading_hold_active());
    assert_eq!(rig.probe.gyro(GYRO), 0.0);
    assert_eq!(rig.robot.drive().command().2, 0.0);

    rig.release(HEADING_HOLD);
    rig.probe.set_gyro(GYRO, 10.0);
    rig.cycle();
    assert!(!rig.robot.heading_hold_active());
    assert_eq!(rig.robot.drive().command().2, 0.0);
}

#[test]
fn reengaged_hold_starts_a_fresh_integral() {
    let mut rig = Rig::builder().gains("0.05\n0.1\n0.15\n").build();
    rig.enter(RobotMode::Teleop);
    rig.press(HEADING_HOLD);
    rig.cycle();
    rig.probe.set_gyro(GYRO, 10.0);
    rig.cycles(3);
    assert!(rig.robot.heading_hold_active());

    rig.release(HEADING_HOLD);
    rig.run_for(5.0);
    assert!(!rig.robot.heading_hold_active());

    rig.press(HEADING_HOLD);
    rig.probe.set_gyro(GYRO, 25.0);
    rig.cycle();
    assert_eq!(rig.robot.drive().command().2, 0.0);

    // One period of integral on a single sample, nothing carried over.
    rig.probe.set_gyro(GYRO, 10.0);
    rig.cycle();
    let twist = rig.robot.drive().command().2;
    assert!((twist + 0.52).abs() < 1e-9, "twist {twist}");
}

#[test]
fn missing_gain_file_only_disables_heading_hold() {
    let mut rig = Rig::builder().build();
    rig.enter(RobotMode::Teleop);
    assert!(rig.robot.heading_gains().is_none());

    rig.probe.set_gyro(GYRO, 10.0);
    rig.press(HEADING_HOLD);
    rig.probe.set_axis(AXIS_TWIST, 0.1);
    rig.cycle();
    assert!(!rig.robot.heading_hold_active());
    assert_eq!(rig.robot.drive().command().2, 0.1);
    assert_eq!(rig.probe.gyro(GYRO), 10.0);

    rig.press(FIRE);
    rig.cycle();
    assert_eq!(rig.robot.catapult().phase(), CatapultPhase::Firing);
}

#[test]
fn malformed_gain_file_only_disables_heading_hold() {
    let mut rig = Rig::builder().gains("0.05\nfast\n0.15\n").build();
    rig.enter(RobotMode::Teleop);
    assert!(rig.robot.heading_gains().is_none());

    rig.press(HEADING_HOLD);
    rig.probe.set_axis(AXIS_Y, -1.0);
    rig.cycle();
    assert!(!rig.robot.heading_hold_active());
    assert_eq!(rig.drive_powers(), [1.0, 1.0, -1.0, -1.0]);
}

#[test]
fn gain_file_reread_on_each_teleop_entry() {
    let mut rig = teleop_rig();
    let gains = rig.robot.heading_gains().unwrap();
    assert_eq!(gains.kp, 0.05);

    std::fs::write(&rig.config.teleop.gains_path, "0.08\n0.01\n0.2\n").unwrap();
    rig.enter(RobotMode::Disabled);
    rig.cycle();
    rig.enter(RobotMode::Teleop);
    let gains = rig.robot.heading_gains().unwrap();
    assert_eq!(gains.kp, 0.08);
    assert_eq!(gains.spin_threshold, 0.2);
}
