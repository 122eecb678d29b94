//! Integration tests for the Robot Control Unit.
//!
//! These tests drive the whole robot through the simulation HAL, cycle by
//! cycle, exercising the lifecycle hooks, the state machines and the
//! configuration together.

mod integration;
