//! # Robot HAL
//!
//! Backends for the hardware interfaces defined in `robo_common::hal`:
//!
//! - [`clock`] - wall-clock and simulated monotonic clocks
//! - [`drivers::simulation`] - in-memory I/O bank with plant links, used by
//!   the simulation binary and by every integration test

pub mod clock;
pub mod drivers;

pub use clock::{MonotonicClock, SimClock};
pub use drivers::simulation::{PlantLink, SimProbe, SimulationDriver};
