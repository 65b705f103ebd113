//! Simulated ship actuator
//!
//! A minimal kinematic stand-in for the game engine: a catalog of solar
//! system bodies, a ship with position/heading/velocity, and a warp flag.
//! Good enough to fly the full maneuver sequence end-to-end; real dynamics
//! live in the host engine behind the same trait.

use std::collections::HashMap;

use glam::{Quat, Vec3};
use tracing::debug;

use bridgelink_shared::CruiseLevel;

use super::actuator::{HelmActuator, ProximityGuard, TargetHandle};

/// Units are megameters; speeds in megameters per second
const FULL_IMPULSE_SPEED: f32 = 300.0;
/// Warp speed scales with the cube of the factor
const WARP_SPEED_UNIT: f32 = 2_000.0;
/// First-order response rate toward the commanded velocity
const ACCEL_RATE: f32 = 0.8;

struct Body {
    name: &'static str,
    position: Vec3,
    /// Minimum safe-maneuver radius, for massive bodies
    hazard_radius: Option<f32>,
}

enum Resolved {
    Body(usize),
    Point(Vec3),
}

/// The simulated vehicle
pub struct SimShip {
    bodies: Vec<Body>,
    handles: HashMap<u32, Resolved>,
    next_handle: u32,
    position: Vec3,
    forward: Vec3,
    velocity: Vec3,
    warp: Option<f32>,
    cruise: CruiseLevel,
}

impl SimShip {
    pub fn new() -> Self {
        let au = 150_000.0; // one AU in megameters, loosely
        let bodies = vec![
            Body { name: "Sun", position: Vec3::ZERO, hazard_radius: Some(20_000.0) },
            Body { name: "Mercury", position: Vec3::new(0.39 * au, 0.0, 0.0), hazard_radius: None },
            Body { name: "Venus", position: Vec3::new(0.0, 0.0, 0.72 * au), hazard_radius: None },
            Body { name: "Earth", position: Vec3::new(au, 0.0, 0.0), hazard_radius: None },
            Body { name: "Moon", position: Vec3::new(au + 384.0, 0.0, 0.0), hazard_radius: None },
            Body { name: "Mars", position: Vec3::new(0.0, 0.0, -1.52 * au), hazard_radius: None },
            Body { name: "Jupiter", position: Vec3::new(-5.2 * au, 0.0, 0.0), hazard_radius: Some(5_000.0) },
            Body { name: "Saturn", position: Vec3::new(0.0, 0.0, 9.5 * au), hazard_radius: None },
            Body { name: "Uranus", position: Vec3::new(13.6 * au, 0.0, 13.6 * au), hazard_radius: None },
            Body { name: "Neptune", position: Vec3::new(0.0, 0.0, -30.0 * au), hazard_radius: None },
            Body { name: "Starbase 1", position: Vec3::new(au, 300.0, 300.0), hazard_radius: None },
        ];

        Self {
            bodies,
            handles: HashMap::new(),
            next_handle: 0,
            position: Vec3::new(au, 500.0, 0.0), // parked near Earth
            forward: Vec3::Z,
            velocity: Vec3::ZERO,
            warp: None,
            cruise: CruiseLevel::Stop,
        }
    }

    /// Integrate ship motion for one tick
    pub fn tick(&mut self, dt: f32) {
        let commanded_speed = match self.warp {
            Some(factor) => factor.powi(3) * WARP_SPEED_UNIT,
            None => self.cruise.fraction() * FULL_IMPULSE_SPEED,
        };
        let commanded = self.forward * commanded_speed;
        let blend = (ACCEL_RATE * dt).min(1.0);
        self.velocity += (commanded - self.velocity) * blend;
        self.position += self.velocity * dt;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    fn resolved_position(&self, handle: TargetHandle) -> Option<Vec3> {
        match self.handles.get(&handle.0)? {
            Resolved::Body(idx) => self.bodies.get(*idx).map(|b| b.position),
            Resolved::Point(p) => Some(*p),
        }
    }

    fn register(&mut self, resolved: Resolved) -> TargetHandle {
        self.next_handle += 1;
        self.handles.insert(self.next_handle, resolved);
        TargetHandle(self.next_handle)
    }
}

impl Default for SimShip {
    fn default() -> Self {
        Self::new()
    }
}

impl HelmActuator for SimShip {
    fn resolve_target(&mut self, name: &str) -> Option<TargetHandle> {
        let idx = self
            .bodies
            .iter()
            .position(|b| b.name.eq_ignore_ascii_case(name.trim()))?;
        Some(self.register(Resolved::Body(idx)))
    }

    fn resolve_point(&mut self, position: Vec3) -> TargetHandle {
        self.register(Resolved::Point(position))
    }

    fn set_heading_towards(&mut self, target: TargetHandle, max_step_rad: f32) -> Option<f32> {
        let target_pos = self.resolved_position(target)?;
        let desired = (target_pos - self.position).normalize_or_zero();
        if desired == Vec3::ZERO {
            return Some(0.0); // already there
        }

        let angle = self.forward.angle_between(desired);
        if angle <= max_step_rad {
            self.forward = desired;
            return Some(0.0);
        }

        let mut axis = self.forward.cross(desired);
        if axis.length_squared() < f32::EPSILON {
            // Directly astern; pick any perpendicular axis
            axis = self.forward.any_orthogonal_vector();
        }
        let rotation = Quat::from_axis_angle(axis.normalize(), max_step_rad);
        self.forward = (rotation * self.forward).normalize();
        Some(angle - max_step_rad)
    }

    fn begin_high_speed_transit(&mut self, factor: f32) {
        debug!("sim: warp engaged at factor {factor}");
        self.warp = Some(factor);
    }

    fn end_high_speed_transit(&mut self) {
        debug!("sim: warp disengaged");
        self.warp = None;
    }

    fn set_cruise_level(&mut self, level: CruiseLevel) {
        self.cruise = level;
    }

    fn emergency_damp(&mut self, retain: f32) {
        self.velocity *= retain.clamp(0.0, 1.0);
    }

    fn distance_to(&self, target: TargetHandle) -> Option<f32> {
        self.resolved_position(target)
            .map(|p| p.distance(self.position))
    }

    fn max_speed_factor(&self) -> f32 {
        9.6
    }

    fn is_in_transit(&self) -> bool {
        self.warp.is_some()
    }

    fn proximity_guard(&self) -> Option<ProximityGuard> {
        self.bodies
            .iter()
            .filter_map(|b| {
                b.hazard_radius.map(|r| ProximityGuard {
                    distance: b.position.distance(self.position),
                    min_radius: r,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
