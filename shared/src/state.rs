//! Maneuver states and the legal-transition table
//!
//! The table is the single source of truth for which state changes the helm
//! may make. Self-transitions are always rejected; anything not listed is
//! rejected and leaves the current state unchanged. The only sanctioned
//! bypass is the helm machine's force-idle path (emergency stop, disengage,
//! lost-target abort).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The helm's maneuver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManeuverState {
    /// No maneuver in progress
    Idle,
    /// Steering the bow onto a new course
    Aligning,
    /// Fixed spin-up delay before warp engages
    WarpCharging,
    /// High-speed transit toward the target
    AtWarp,
    /// Fixed cooldown after dropping out of warp
    WarpExiting,
    /// Sub-light cruise at a discretized impulse level
    Impulse,
    /// Bounded-duration turn or orbit hold
    Maneuvering,
}

impl ManeuverState {
    /// All states, for exhaustive property checks
    pub const ALL: [ManeuverState; 7] = [
        ManeuverState::Idle,
        ManeuverState::Aligning,
        ManeuverState::WarpCharging,
        ManeuverState::AtWarp,
        ManeuverState::WarpExiting,
        ManeuverState::Impulse,
        ManeuverState::Maneuvering,
    ];

    /// States this one may legally enter next
    pub fn allowed_next(&self) -> &'static [ManeuverState] {
        use ManeuverState::*;
        match self {
            Idle => &[Aligning, Impulse, Maneuvering],
            Impulse => &[Idle, Aligning, Maneuvering],
            Aligning => &[WarpCharging],
            WarpCharging => &[AtWarp],
            AtWarp => &[WarpExiting],
            WarpExiting => &[Idle],
            Maneuvering => &[Idle],
        }
    }

    /// Busy states block new navigation, speed and turn commands
    pub fn is_busy(&self) -> bool {
        !matches!(self, ManeuverState::Idle | ManeuverState::Impulse)
    }
}

impl fmt::Display for ManeuverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ManeuverState::Idle => "idle",
            ManeuverState::Aligning => "aligning to course",
            ManeuverState::WarpCharging => "charging warp drive",
            ManeuverState::AtWarp => "at warp",
            ManeuverState::WarpExiting => "dropping out of warp",
            ManeuverState::Impulse => "at impulse",
            ManeuverState::Maneuvering => "maneuvering",
        };
        f.write_str(s)
    }
}

/// Check if a transition is legal: listed in the table and not a self-transition
pub fn is_valid_transition(from: ManeuverState, to: ManeuverState) -> bool {
    from != to && from.allowed_next().contains(&to)
}

/// A refused state change; the prior state is unchanged
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot go from {from} to {to}")]
pub struct TransitionError {
    pub from: ManeuverState,
    pub to: ManeuverState,
}

/// Discretized sub-light cruise levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CruiseLevel {
    Stop,
    Quarter,
    Half,
    ThreeQuarter,
    Full,
}

impl CruiseLevel {
    /// Map a requested percentage onto a level via the monotonic threshold table
    pub fn from_percent(percent: f32) -> Self {
        if percent >= 100.0 {
            CruiseLevel::Full
        } else if percent >= 75.0 {
            CruiseLevel::ThreeQuarter
        } else if percent >= 50.0 {
            CruiseLevel::Half
        } else if percent >= 25.0 {
            CruiseLevel::Quarter
        } else {
            CruiseLevel::Stop
        }
    }

    /// The fraction of full impulse this level represents
    pub fn fraction(&self) -> f32 {
        match self {
            CruiseLevel::Stop => 0.0,
            CruiseLevel::Quarter => 0.25,
            CruiseLevel::Half => 0.5,
            CruiseLevel::ThreeQuarter => 0.75,
            CruiseLevel::Full => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CruiseLevel::Stop => "all stop",
            CruiseLevel::Quarter => "one-quarter impulse",
            CruiseLevel::Half => "half impulse",
            CruiseLevel::ThreeQuarter => "three-quarter impulse",
            CruiseLevel::Full => "full impulse",
        }
    }
}
