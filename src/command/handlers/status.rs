//! Status report handler

use bridgelink_shared::BridgeCommand;

use super::HandlerContext;
use crate::command::CommandOutcome;

/// Handle STATUS: summarize helm and ship systems in the acknowledgment
pub fn handle_status(ctx: &mut HandlerContext, _command: &BridgeCommand) -> CommandOutcome {
    let machine = &ctx.machine;
    let mut parts = vec![format!("Maneuver state: {}", machine.state())];

    if let Some((name, factor)) = machine.active_course() {
        parts.push(format!("course laid in for {name} at warp {factor}"));
    }
    parts.push(format!("impulse: {}", machine.cruise().as_str()));
    parts.push(format!(
        "shields: {}",
        if ctx.systems.shields_raised { "up" } else { "down" }
    ));
    if let Some(dest) = &machine.memory().last_destination {
        parts.push(format!("last course: {dest}"));
    }

    CommandOutcome::accepted(parts.join("; "))
}
