//! # Robot Control Unit Library
//!
//! Periodic control core of the competition robot. Every control period the
//! host calls exactly one lifecycle hook; each hook reads sensors and the
//! driver's joystick, advances the subsystem state machines and writes all
//! actuator outputs before returning.
//!
//! ## Components
//!
//! 1. **Catapult** - 5-phase launch machine (`state::catapult`)
//! 2. **Collector** - mode × automatic-substate machine (`state::collector`)
//! 3. **Autonomous sequences** - unfolding and approach-and-fire (`state::autonomous`)
//! 4. **Heading corrector** - PI heading-hold filter (`control::heading`)
//! 5. **Robot** - orchestrator dispatching lifecycle hooks (`orchestrator`)
//!
//! ## Single-Threaded Cycle
//!
//! Nothing in the cycle blocks. Timers sample a shared monotonic clock, so
//! tests drive the whole robot deterministically with a simulated clock.

pub mod config;
pub mod control;
pub mod cycle;
pub mod diagnostics;
pub mod orchestrator;
pub mod state;
pub mod timer;
