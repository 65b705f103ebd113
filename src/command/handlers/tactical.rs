//! Shield command handlers

use bridgelink_shared::BridgeCommand;

use super::HandlerContext;
use crate::command::CommandOutcome;

pub fn handle_raise_shields(ctx: &mut HandlerContext, _command: &BridgeCommand) -> CommandOutcome {
    if ctx.systems.shields_raised {
        CommandOutcome::accepted("Shields already raised")
    } else {
        ctx.systems.shields_raised = true;
        CommandOutcome::accepted("Shields up")
    }
}

pub fn handle_lower_shields(ctx: &mut HandlerContext, _command: &BridgeCommand) -> CommandOutcome {
    if !ctx.systems.shields_raised {
        CommandOutcome::accepted("Shields already lowered")
    } else {
        ctx.systems.shields_raised = false;
        CommandOutcome::accepted("Shields down")
    }
}
