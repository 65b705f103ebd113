//! Command router: decode, validate, dispatch, acknowledge

use tracing::{debug, warn};

use bridgelink_shared::{decode_command, Ack, BridgeCommand, Intent};

use super::handlers::{self, HandlerContext, ShipSystems};
use super::CommandOutcome;
use crate::helm::{HelmActuator, HelmStateMachine};

/// Higher-level routing authority
///
/// When one is registered the router delegates every validated command to it
/// and relays its outcome verbatim as the acknowledgment payload.
pub trait RoutingAuthority {
    fn route(&mut self, command: &BridgeCommand) -> CommandOutcome;
}

/// Routes validated commands to intent handlers
pub struct CommandRouter {
    authority: Option<Box<dyn RoutingAuthority>>,
    systems: ShipSystems,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self {
            authority: None,
            systems: ShipSystems::default(),
        }
    }

    pub fn with_authority(authority: Box<dyn RoutingAuthority>) -> Self {
        Self {
            authority: Some(authority),
            systems: ShipSystems::default(),
        }
    }

    /// Process one message line and produce its acknowledgment
    ///
    /// Always returns exactly one ack: a rejection with a reason when the
    /// message fails decoding or validation, the handler outcome otherwise.
    /// Coercion warnings ride along on the acknowledgment message.
    pub fn handle_line(
        &mut self,
        line: &str,
        machine: &mut HelmStateMachine,
        actuator: &mut dyn HelmActuator,
    ) -> Ack {
        let command = match decode_command(line) {
            Ok(command) => command,
            Err(e) => {
                warn!("rejected message: {e}");
                return Ack::rejected(e.to_string());
            }
        };

        debug!(
            "dispatching {} / {}",
            command.department.as_str(),
            command.intent.as_str()
        );
        let outcome = self.dispatch(&command, machine, actuator);

        let mut message = outcome.message().to_string();
        if !command.warnings.is_empty() {
            message = format!("{message} (warning: {})", command.warnings.join("; "));
        }

        if outcome.success() {
            Ack::accepted(message)
        } else {
            warn!("command rejected: {message}");
            Ack::rejected(message)
        }
    }

    /// Dispatch a validated command to its handler
    pub fn dispatch(
        &mut self,
        command: &BridgeCommand,
        machine: &mut HelmStateMachine,
        actuator: &mut dyn HelmActuator,
    ) -> CommandOutcome {
        if let Some(authority) = self.authority.as_mut() {
            return authority.route(command);
        }

        let mut ctx = HandlerContext {
            machine,
            actuator,
            systems: &mut self.systems,
        };

        // Intent is a closed sum type, so dispatch is checked exhaustively at
        // compile time; there is no unrecognized-intent branch to defend.
        match command.intent {
            Intent::Navigate => handlers::handle_navigate(&mut ctx, command),
            Intent::NavigateCoordinates => handlers::handle_navigate_coordinates(&mut ctx, command),
            Intent::Warp => handlers::handle_warp(&mut ctx, command),
            Intent::Impulse => handlers::handle_impulse(&mut ctx, command),
            Intent::Stop => handlers::handle_stop(&mut ctx, command),
            Intent::Turn => handlers::handle_turn(&mut ctx, command),
            Intent::Orbit => handlers::handle_orbit(&mut ctx, command),
            Intent::RaiseShields => handlers::handle_raise_shields(&mut ctx, command),
            Intent::LowerShields => handlers::handle_lower_shields(&mut ctx, command),
            Intent::Disengage => handlers::handle_disengage(&mut ctx, command),
            Intent::Status => handlers::handle_status(&mut ctx, command),
        }
    }
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::new()
    }
}
