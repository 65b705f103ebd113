//! Bridgelink Shared Protocol Types
//!
//! This crate provides the protocol types, line codec and maneuver-state
//! primitives shared between the helm server and any tooling that speaks
//! the bridge command protocol.

pub mod ack;
pub mod codec;
pub mod command;
pub mod state;
pub mod validate;

use std::time::{SystemTime, UNIX_EPOCH};

pub use ack::Ack;
pub use command::{BridgeCommand, Department, Intent};
pub use state::{CruiseLevel, ManeuverState, TransitionError};
pub use validate::{decode_command, ValidationError};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Helm tuning parameters for the maneuver sequence
pub mod helm {
    /// Turn rate applied while aligning to a new course, radians per second
    pub const ALIGN_RATE_RAD_PER_SEC: f32 = 0.6;

    /// Remaining angle below which alignment is considered complete
    pub const ALIGN_COMPLETE_RAD: f32 = 0.01;

    /// Spin-up delay between course alignment and warp engagement, seconds
    pub const WARP_SPINUP_SECS: f32 = 3.0;

    /// Cooldown after dropping out of warp before the helm is free again
    pub const WARP_EXIT_COOLDOWN_SECS: f32 = 2.0;

    /// Duration of a turn or orbit hold before returning to idle
    pub const MANEUVER_HOLD_SECS: f32 = 4.0;

    /// Distance to target at which warp exit begins
    pub const ARRIVAL_THRESHOLD: f32 = 5_000.0;

    /// Warp factor used when a course is set without one
    pub const DEFAULT_WARP_FACTOR: f32 = 5.0;

    /// Impulse percentage assumed when a speed command carries none
    pub const DEFAULT_IMPULSE_PERCENT: f32 = 100.0;

    /// Fraction of velocity retained by an emergency stop (damped, not zeroed)
    pub const DEFAULT_STOP_DAMPING_RETAIN: f32 = 0.25;

    /// Exclusive upper bound for warp factors
    pub const WARP_FACTOR_LIMIT: f32 = 10.0;
}
