//! Turn and orbit handlers: bounded-duration maneuvers

use bridgelink_shared::BridgeCommand;

use super::HandlerContext;
use crate::command::CommandOutcome;

/// Handle TURN: a bounded hold under a named maneuver label
pub fn handle_turn(ctx: &mut HandlerContext, command: &BridgeCommand) -> CommandOutcome {
    let label = command
        .maneuver
        .clone()
        .unwrap_or_else(|| "turn to new heading".to_string());
    ctx.machine.begin_maneuver(label).into()
}

/// Handle ORBIT: a bounded hold around a resolvable target
pub fn handle_orbit(ctx: &mut HandlerContext, command: &BridgeCommand) -> CommandOutcome {
    let Some(name) = command.target.as_deref() else {
        return CommandOutcome::rejected("no orbit target given");
    };
    if ctx.actuator.resolve_target(name).is_none() {
        return CommandOutcome::rejected(format!("unknown destination '{name}'"));
    }
    ctx.machine
        .begin_maneuver(format!("standard orbit around {name}"))
        .into()
}
