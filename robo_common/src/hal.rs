//! Hardware abstraction interfaces.
//!
//! The control core talks to hardware only through the traits in
//! [`driver`] and reads time only through [`clock::Clock`]. Backends (the
//! simulation driver in `robo_hal`, or a real I/O board) implement them.

pub mod clock;
pub mod driver;
