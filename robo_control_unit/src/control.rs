//! Closed-loop filters and the drive base.
//!
//! - `heading`: PI heading-hold corrector (teleop)
//! - `approach`: PI range approach (autonomous)
//! - `drive`: mecanum wheel mixing

pub mod approach;
pub mod drive;
pub mod heading;
