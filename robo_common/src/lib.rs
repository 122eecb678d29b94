//! Robot Common Library
//!
//! This crate provides the types shared by every crate of the robot control
//! workspace: state machine enums, configuration structures and loaders,
//! hardware interface traits and system constants.
//!
//! # Module Structure
//!
//! - [`consts`] - Control-loop thresholds, timings and default channel numbers
//! - [`config`] - Configuration loading traits and the heading gain file
//! - [`control_unit`] - State enums and configuration sections of the control unit
//! - [`hal`] - Hardware interface traits and HAL errors
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use robo_common::prelude::*;
//! use robo_common::config::{ConfigLoader, SharedConfig};
//! ```

pub mod config;
pub mod consts;
pub mod control_unit;
pub mod hal;
pub mod prelude;
