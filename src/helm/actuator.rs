//! Actuator interface consumed by the helm core
//!
//! The ship's physical dynamics live behind this trait: the helm machine
//! requests heading changes, transit engagement and damping, and reads back
//! distances. The binary wires in the simulated ship; tests use mocks.

use glam::Vec3;

use bridgelink_shared::CruiseLevel;

/// Opaque reference to a resolved navigation target
///
/// Handles can go stale (the body was destroyed); lookups through the
/// actuator then return `None` and the helm aborts the maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetHandle(pub u32);

/// Minimum safe-maneuver radius check around a massive body
#[derive(Debug, Clone, Copy)]
pub struct ProximityGuard {
    /// Distance from the nearest hazard
    pub distance: f32,
    /// Radius inside which high-speed maneuvers are refused
    pub min_radius: f32,
}

impl ProximityGuard {
    pub fn is_violated(&self) -> bool {
        self.distance < self.min_radius
    }
}

/// The narrow interface the helm core drives the vehicle through
pub trait HelmActuator {
    /// Resolve a named destination to a handle, if it exists
    fn resolve_target(&mut self, name: &str) -> Option<TargetHandle>;

    /// Resolve a raw coordinate triple to a point target (always succeeds)
    fn resolve_point(&mut self, position: Vec3) -> TargetHandle;

    /// Rotate the bow toward the target by at most `max_step_rad` radians
    ///
    /// Returns the remaining angle after the step, or `None` when the target
    /// reference is no longer valid.
    fn set_heading_towards(&mut self, target: TargetHandle, max_step_rad: f32) -> Option<f32>;

    /// Engage (or re-trim, while engaged) high-speed transit at the given factor
    fn begin_high_speed_transit(&mut self, factor: f32);

    /// End high-speed transit
    fn end_high_speed_transit(&mut self);

    /// Apply a discretized sub-light cruise level
    fn set_cruise_level(&mut self, level: CruiseLevel);

    /// Damp residual velocity, retaining the given fraction
    fn emergency_damp(&mut self, retain: f32);

    /// Distance to the target, or `None` when the reference is no longer valid
    fn distance_to(&self, target: TargetHandle) -> Option<f32>;

    /// The vehicle's maximum sustainable speed factor
    fn max_speed_factor(&self) -> f32;

    /// Whether high-speed transit is currently engaged
    fn is_in_transit(&self) -> bool;

    /// Proximity guard, when a collocated one exists
    fn proximity_guard(&self) -> Option<ProximityGuard> {
        None
    }
}
