//! Property tests for the catapult's stopping-point comparison.

use std::sync::Arc;

use proptest::prelude::*;
use robo_common::control_unit::state::CatapultPhase;
use robo_common::hal::driver::HalDriver;
use robo_control_unit::state::catapult::Catapult;
use robo_hal::{SimClock, SimProbe, SimulationDriver};

const M1: u8 = 4;
const M2: u8 = 5;
const ENC: u8 = 5;

fn catapult() -> (Catapult, SimProbe) {
    let mut hal = SimulationDriver::new();
    let probe = hal.probe();
    let catapult = Catapult::new(
        hal.motor(M1).unwrap(),
        hal.motor(M2).unwrap(),
        hal.encoder(ENC).unwrap(),
        Arc::new(SimClock::new()),
    );
    (catapult, probe)
}

proptest! {
    /// Firing holds exactly while the count is below the stopping point and
    /// ends on the first reading at or past it.
    #[test]
    fn firing_ends_at_first_count_reaching_stopping_point(
        stopping_point in 0i32..2000,
        power in 0.05f64..=1.0,
        counts in prop::collection::vec(-100i32..2500, 1..40),
    ) {
        let (mut cat, probe) = catapult();
        cat.set_stopping_point(stopping_point);
        cat.set_motor_power(power);
        cat.fire();

        for count in counts {
            probe.set_encoder(ENC, f64::from(count));
            cat.tick();
            if count < stopping_point {
                prop_assert_eq!(cat.phase(), CatapultPhase::Firing);
                prop_assert_eq!(probe.motor_power(M1), power);
                prop_assert_eq!(probe.motor_power(M2), power);
            } else {
                prop_assert_eq!(cat.phase(), CatapultPhase::Lowering);
                prop_assert_eq!(probe.motor_power(M1), 0.0);
                prop_assert_eq!(probe.motor_power(M2), 0.0);
                break;
            }
        }
    }

    /// Counts rising from zero stop within one step of the stopping point.
    #[test]
    fn rising_encoder_stops_near_stopping_point(
        stopping_point in 0i32..1000,
        step in 1i32..20,
    ) {
        let (mut cat, probe) = catapult();
        cat.set_stopping_point(stopping_point);
        cat.fire();

        let mut count = 0;
        loop {
            probe.set_encoder(ENC, f64::from(count));
            cat.tick();
            if cat.phase() != CatapultPhase::Firing {
                break;
            }
            count += step;
        }
        prop_assert!(count >= stopping_point);
        prop_assert!(count < stopping_point + step);
    }
}
