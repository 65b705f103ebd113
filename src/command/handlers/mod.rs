//! Intent handlers
//!
//! Each handler talks to the helm machine and/or actuator through the shared
//! context and returns an outcome; nothing here writes maneuver state
//! directly. Defaulting of absent optional fields happens in these handlers,
//! never in validation.

mod maneuver;
mod navigate;
mod speed;
mod status;
mod tactical;

pub use maneuver::{handle_orbit, handle_turn};
pub use navigate::{handle_navigate, handle_navigate_coordinates, handle_warp};
pub use speed::{handle_disengage, handle_impulse, handle_stop};
pub use status::handle_status;
pub use tactical::{handle_lower_shields, handle_raise_shields};

use crate::helm::{HelmActuator, HelmStateMachine};

/// Non-maneuver ship systems tracked by the router
#[derive(Debug, Default)]
pub struct ShipSystems {
    pub shields_raised: bool,
}

/// Context passed to command handlers
pub struct HandlerContext<'a> {
    pub machine: &'a mut HelmStateMachine,
    pub actuator: &'a mut dyn HelmActuator,
    pub systems: &'a mut ShipSystems,
}
