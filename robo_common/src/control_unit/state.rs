//! State machine enums for the control unit.
//!
//! Each machine is an explicit enumeration with exactly one active variant.
//! The collector's nested machine is a tagged variant so an automatic
//! substate can only exist while the collector is automatic.

use serde::{Deserialize, Serialize};

// ─── Robot Lifecycle ────────────────────────────────────────────────

/// Operating mode requested by the host (field management system).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RobotMode {
    /// Outputs inert, controllers held safe.
    #[default]
    Disabled,
    /// Scripted opening routine.
    Autonomous,
    /// Driver control.
    Teleop,
    /// Pit/maintenance mode.
    Test,
}

impl RobotMode {
    /// Short label for logs and the diagnostic display.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Disabled => "Disabled",
            Self::Autonomous => "Auto",
            Self::Teleop => "Teleop",
            Self::Test => "Test",
        }
    }
}

// ─── Catapult ───────────────────────────────────────────────────────

/// Catapult firing cycle.
///
/// `Idle → Firing → Lowering → Zeroing → Idle`, with the side entry
/// `AutoLowering → Zeroing` used to unfold the robot at autonomous start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CatapultPhase {
    /// Waiting for a command, motors off.
    #[default]
    Idle,
    /// Driving the arm until the stopping point is reached.
    Firing,
    /// Gently returning the arm after a shot.
    Lowering,
    /// Single-cycle encoder reset.
    Zeroing,
    /// Aggressive lower used to unfold the robot.
    AutoLowering,
}

impl CatapultPhase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Firing => "Firing",
            Self::Lowering => "Lowering",
            Self::Zeroing => "Zeroing",
            Self::AutoLowering => "AutoLower",
        }
    }
}

// ─── Collector ──────────────────────────────────────────────────────

/// Nested state of the collector's automatic mode.
///
/// Always cycles `Lowering → Waiting → WaitForBall → Raising → Lowering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CollectorSubstate {
    /// Lowering the arm onto the lower limit switch.
    #[default]
    Lowering,
    /// Rolling until the ball sensor trips.
    Waiting,
    /// Dwell so the ball settles past the sensor.
    WaitForBall,
    /// Lifting the ball into the catapult.
    Raising,
}

impl CollectorSubstate {
    /// The substate that follows this one in the automatic cycle.
    #[inline]
    pub const fn next(self) -> Self {
        match self {
            Self::Lowering => Self::Waiting,
            Self::Waiting => Self::WaitForBall,
            Self::WaitForBall => Self::Raising,
            Self::Raising => Self::Lowering,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Lowering => "Lowering",
            Self::Waiting => "Waiting",
            Self::WaitForBall => "WaitBall",
            Self::Raising => "Raising",
        }
    }
}

/// Top-level collector mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CollectorMode {
    /// Sensor-driven collect-and-lift cycle.
    Automatic(CollectorSubstate),
    /// Both motors off.
    #[default]
    Disabled,
    /// Driver controls the roller.
    ManualRoller,
    /// Driver controls the arm.
    ManualRaise,
}

impl CollectorMode {
    /// Active automatic substate, if any.
    #[inline]
    pub const fn substate(self) -> Option<CollectorSubstate> {
        match self {
            Self::Automatic(sub) => Some(sub),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_automatic(self) -> bool {
        matches!(self, Self::Automatic(_))
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Automatic(_) => "Auto",
            Self::Disabled => "Disabled",
            Self::ManualRoller => "ManRoller",
            Self::ManualRaise => "ManRaise",
        }
    }
}

// ─── Autonomous Sequences ───────────────────────────────────────────

/// Unfolding sub-sequence of the autonomous routine. Runs once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnfoldingPhase {
    /// Collector lowers itself (automatic mode) while the gate runs.
    #[default]
    LowerCollector,
    /// Command the catapult's unfolding lower.
    LowerCatapult,
    /// Wait for the catapult to report the unfolding lower.
    WaitForCatapult,
    /// Wait for the completion gate, then stop the collector.
    AwaitCompletion,
    /// Unfolding finished.
    Done,
}

impl UnfoldingPhase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::LowerCollector => "LowerColl",
            Self::LowerCatapult => "LowerCata",
            Self::WaitForCatapult => "WaitCata",
            Self::AwaitCompletion => "Settle",
            Self::Done => "Done",
        }
    }
}

/// Approach-and-fire sub-sequence of the autonomous routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ApproachPhase {
    /// Drive held at zero during the opening wait.
    #[default]
    Waiting,
    /// Closing on the standoff distance; the shot is taken from here.
    Running,
    /// Standoff reached, drive held at zero.
    Stopped,
}

impl ApproachPhase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::Running => "Running",
            Self::Stopped => "Stopped",
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
