//! Monotonic time source.

use std::sync::Arc;
use std::time::Duration;

/// A monotonic clock sampled by timers and the heading corrector.
///
/// `now()` never decreases. The origin is arbitrary but fixed for the life
/// of the clock.
pub trait Clock: Send + Sync {
    /// Time since the clock's origin.
    fn now(&self) -> Duration;
}

/// Clock handle shared by every component of one robot.
pub type SharedClock = Arc<dyn Clock>;
