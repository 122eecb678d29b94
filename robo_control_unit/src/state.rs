//! Subsystem state machines.

pub mod autonomous;
pub mod catapult;
pub mod collector;
