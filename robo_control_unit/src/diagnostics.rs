//! Diagnostic display page.
//!
//! A [`RobotSnapshot`] is rendered into fixed-capacity lines so the cycle
//! never allocates. Formatting stops at the first fragment that would
//! overflow its line; the text written before it is kept.

use core::fmt::Write;

use robo_common::consts::{DISPLAY_LINE_WIDTH, DISPLAY_LINES};
use robo_common::control_unit::state::{
    ApproachPhase, CatapultPhase, CollectorMode, RobotMode, UnfoldingPhase,
};
use robo_common::hal::driver::DiagnosticDisplay;

pub type Line = heapless::String<DISPLAY_LINE_WIDTH>;

/// Read-only view of the robot's state at the end of a cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotSnapshot {
    pub mode: RobotMode,
    pub catapult_phase: CatapultPhase,
    pub encoder_count: i32,
    pub stopping_point: i32,
    pub motor_power: f64,
    pub collector_mode: CollectorMode,
    pub unfolding: UnfoldingPhase,
    pub approach: ApproachPhase,
    pub fired: bool,
    pub heading_hold: bool,
}

/// Render the display page, one entry per display line.
pub fn render(snapshot: &RobotSnapshot) -> [Line; DISPLAY_LINES] {
    let mut lines: [Line; DISPLAY_LINES] = core::array::from_fn(|_| Line::new());
    // `heapless::String` rejects a fragment that does not fit.
    let _ = write!(
        lines[0],
        "Mode: {}{}",
        snapshot.mode.name(),
        if snapshot.heading_hold { " [hold]" } else { "" }
    );
    let _ = write!(
        lines[1],
        "Cata: {} {}",
        snapshot.catapult_phase.name(),
        snapshot.encoder_count
    );
    let _ = write!(
        lines[2],
        "Stop: {} Pwr: {:.2}",
        snapshot.stopping_point, snapshot.motor_power
    );
    let _ = match snapshot.collector_mode.substate() {
        Some(sub) => write!(lines[3], "Coll: {}/{}", snapshot.collector_mode.name(), sub.name()),
        None => write!(lines[3], "Coll: {}", snapshot.collector_mode.name()),
    };
    let _ = write!(lines[4], "Unfold: {}", snapshot.unfolding.name());
    let _ = write!(
        lines[5],
        "Appr: {}{}",
        snapshot.approach.name(),
        if snapshot.fired { " fired" } else { "" }
    );
    lines
}

/// Write every rendered line to the display.
pub fn publish(display: &mut dyn DiagnosticDisplay, snapshot: &RobotSnapshot) {
    for (index, line) in render(snapshot).iter().enumerate() {
        display.write_line(index, line.as_str());
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
