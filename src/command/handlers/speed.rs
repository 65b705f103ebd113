//! Speed command handlers (impulse, stop, disengage)

use bridgelink_shared::{helm, BridgeCommand, CruiseLevel};

use super::HandlerContext;
use crate::command::CommandOutcome;

/// Handle IMPULSE: discretize the requested percentage onto a cruise level
///
/// A missing percentage falls back to full impulse; the validator has already
/// attached a warning when the value was present but unreadable.
pub fn handle_impulse(ctx: &mut HandlerContext, command: &BridgeCommand) -> CommandOutcome {
    let percent = command
        .impulse_percent
        .unwrap_or(helm::DEFAULT_IMPULSE_PERCENT);
    let level = CruiseLevel::from_percent(percent);
    ctx.machine.set_cruise(ctx.actuator, level).into()
}

/// Handle STOP: universal emergency override, legal from every state
pub fn handle_stop(ctx: &mut HandlerContext, _command: &BridgeCommand) -> CommandOutcome {
    CommandOutcome::accepted(ctx.machine.emergency_stop(ctx.actuator))
}

/// Handle DISENGAGE: drop the warp sequence without the emergency damp
pub fn handle_disengage(ctx: &mut HandlerContext, _command: &BridgeCommand) -> CommandOutcome {
    CommandOutcome::accepted(ctx.machine.disengage(ctx.actuator))
}
