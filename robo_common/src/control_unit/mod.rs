//! Control unit shared types.
//!
//! All types shared between the control unit and the other robot crates live
//! here: state machine enums and the configuration sections of `robot.toml`.

pub mod config;
pub mod state;
