//! Helm core: the maneuver state machine and the actuator seam
//!
//! This module owns everything about how the vehicle maneuvers:
//! - The actuator trait the physical dynamics live behind
//! - The state machine that sequences alignment, spin-up, transit and exit
//! - Short-term memory for contextual follow-up commands
//! - A simulated ship so the binary runs without a host engine

mod actuator;
mod machine;
mod sim;

pub use actuator::HelmActuator;
pub use machine::HelmStateMachine;
pub use sim::SimShip;
