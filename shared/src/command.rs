//! Bridge command types
//!
//! A [`BridgeCommand`] is the fully validated form of one inbound protocol
//! message. Raw messages are parsed and range-checked in [`crate::validate`];
//! nothing downstream of that module ever sees an out-of-schema command.

use glam::Vec3;

/// Ship departments that can receive commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Department {
    Helm,
    Tactical,
    Engineering,
    Ops,
}

impl Department {
    /// Parse the wire spelling of a department, if known
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "helm" => Some(Department::Helm),
            "tactical" => Some(Department::Tactical),
            "engineering" => Some(Department::Engineering),
            "ops" => Some(Department::Ops),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Helm => "helm",
            Department::Tactical => "tactical",
            Department::Engineering => "engineering",
            Department::Ops => "ops",
        }
    }
}

/// Command intents (what action to take)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Set course to a named destination
    Navigate,
    /// Set course to an x/y/z position
    NavigateCoordinates,
    /// Engage warp drive (contextual: reuses the last course when no target is given)
    Warp,
    /// Set impulse speed
    Impulse,
    /// All stop
    Stop,
    /// Turn / rotate the ship
    Turn,
    RaiseShields,
    LowerShields,
    /// Enter a standard orbit around a target
    Orbit,
    /// Disengage warp or autopilot without the emergency damp
    Disengage,
    /// Report ship status
    Status,
}

impl Intent {
    /// Parse the wire spelling of an intent, if known
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "navigate" => Some(Intent::Navigate),
            "navigate_coordinates" => Some(Intent::NavigateCoordinates),
            "warp" => Some(Intent::Warp),
            "impulse" => Some(Intent::Impulse),
            "stop" => Some(Intent::Stop),
            "turn" => Some(Intent::Turn),
            "raise_shields" => Some(Intent::RaiseShields),
            "lower_shields" => Some(Intent::LowerShields),
            "orbit" => Some(Intent::Orbit),
            "disengage" => Some(Intent::Disengage),
            "status" => Some(Intent::Status),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Navigate => "navigate",
            Intent::NavigateCoordinates => "navigate_coordinates",
            Intent::Warp => "warp",
            Intent::Impulse => "impulse",
            Intent::Stop => "stop",
            Intent::Turn => "turn",
            Intent::RaiseShields => "raise_shields",
            Intent::LowerShields => "lower_shields",
            Intent::Orbit => "orbit",
            Intent::Disengage => "disengage",
            Intent::Status => "status",
        }
    }
}

/// One validated bridge command
///
/// Optional fields are exactly as the sender provided them; defaulting is the
/// router's job. `warnings` carries coercion notes the validator wants
/// surfaced in the acknowledgment (a number sent as unreadable text, etc.).
#[derive(Debug, Clone)]
pub struct BridgeCommand {
    pub department: Department,
    pub intent: Intent,
    pub target: Option<String>,
    pub warp_factor: Option<f32>,
    pub impulse_percent: Option<f32>,
    pub maneuver: Option<String>,
    pub coordinates: Option<Vec3>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_round_trip() {
        for d in [
            Department::Helm,
            Department::Tactical,
            Department::Engineering,
            Department::Ops,
        ] {
            assert_eq!(Department::parse(d.as_str()), Some(d));
        }
        assert_eq!(Department::parse("sickbay"), None);
    }

    #[test]
    fn test_intent_round_trip() {
        for i in [
            Intent::Navigate,
            Intent::NavigateCoordinates,
            Intent::Warp,
            Intent::Impulse,
            Intent::Stop,
            Intent::Turn,
            Intent::RaiseShields,
            Intent::LowerShields,
            Intent::Orbit,
            Intent::Disengage,
            Intent::Status,
        ] {
            assert_eq!(Intent::parse(i.as_str()), Some(i));
        }
        assert_eq!(Intent::parse("self_destruct"), None);
    }
}
