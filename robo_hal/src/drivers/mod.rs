//! HAL driver implementations.

pub mod simulation;
