//! Simulation driver.
//!
//! Software stand-in for the robot's I/O board:
//! - [`io`] - the I/O bank and the channel handles handed to the control unit
//! - [`driver`] - `SimulationDriver` (implements `HalDriver`) and `SimProbe`
//! - [`plant`] - first-order links from motor outputs to sensor readings

pub mod driver;
pub mod io;
pub mod plant;

pub use driver::{SimProbe, SimulationDriver};
pub use plant::PlantLink;
