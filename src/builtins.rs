// src/builtins.rs

//! Optional commands the console can provide itself.

use crate::line::Args;
use crate::registry::CommandContext;

/// Prints the name of every registered command, one per line, in
/// registration order.
pub fn list_commands(ctx: &mut CommandContext<'_>, _args: &Args<'_>) {
    ctx.write_command_list();
}
