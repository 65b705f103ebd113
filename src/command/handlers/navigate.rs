//! Navigation command handlers (named targets, coordinates, contextual warp)

use bridgelink_shared::{helm, BridgeCommand};

use super::HandlerContext;
use crate::command::CommandOutcome;

/// Handle NAVIGATE: set course for a named destination
pub fn handle_navigate(ctx: &mut HandlerContext, command: &BridgeCommand) -> CommandOutcome {
    let Some(name) = command.target.as_deref() else {
        return CommandOutcome::rejected("no destination given");
    };
    let factor = command
        .warp_factor
        .unwrap_or(helm::DEFAULT_WARP_FACTOR);
    engage_course(ctx, name, factor)
}

/// Handle NAVIGATE_COORDINATES: set course for a raw position
pub fn handle_navigate_coordinates(
    ctx: &mut HandlerContext,
    command: &BridgeCommand,
) -> CommandOutcome {
    let Some(position) = command.coordinates else {
        return CommandOutcome::rejected("coordinate navigation needs x, y and z");
    };
    let factor = command
        .warp_factor
        .unwrap_or(helm::DEFAULT_WARP_FACTOR);
    let handle = ctx.actuator.resolve_point(position);
    let display = format!("({:.1}, {:.1}, {:.1})", position.x, position.y, position.z);

    // Coordinates are not written to the destination memory; "return to last
    // destination" re-resolves by name, which a raw point does not have.
    ctx.machine
        .begin_navigation(ctx.actuator, handle, display, factor, false)
        .into()
}

/// Handle WARP, the contextual engage
///
/// While at warp this re-trims the active factor ("increase to warp 7").
/// Otherwise it lays in a course, falling back to short-term memory for a
/// missing target or factor.
pub fn handle_warp(ctx: &mut HandlerContext, command: &BridgeCommand) -> CommandOutcome {
    if ctx.actuator.is_in_transit() {
        return ctx
            .machine
            .set_transit_factor(ctx.actuator, command.warp_factor)
            .into();
    }

    let memory = ctx.machine.memory();
    let Some(name) = command
        .target
        .clone()
        .or_else(|| memory.last_destination.clone())
    else {
        return CommandOutcome::rejected("no destination given and no course on record");
    };
    let factor = command
        .warp_factor
        .or(memory.last_warp_factor)
        .unwrap_or(helm::DEFAULT_WARP_FACTOR);

    engage_course(ctx, &name, factor)
}

fn engage_course(ctx: &mut HandlerContext, name: &str, factor: f32) -> CommandOutcome {
    let Some(handle) = ctx.actuator.resolve_target(name) else {
        return CommandOutcome::rejected(format!("unknown destination '{name}'"));
    };
    ctx.machine
        .begin_navigation(ctx.actuator, handle, name.to_string(), factor, true)
        .into()
}
