//! Built-in help command

use super::Command;
use crate::context::Context;
use crate::error::{CliError, CliResult};

/// Conventional name of the help command
pub const HELP_COMMAND: &str = "help";

/// A `help` command to add as a child.
///
/// `help` alone prints the parent's usage; `help a b` prints the usage of
/// the command `a b` below the parent.
pub fn help_command(desc: impl Into<String>) -> Command {
    Command::new(HELP_COMMAND, desc)
        .no_hook()
        .handler(help_command_fn)
}

/// Handler behind [`help_command`]
pub fn help_command_fn(ctx: &mut Context<'_>) -> CliResult<()> {
    let command = ctx.command();
    let parent = command.parent().unwrap_or(command);
    let args = ctx.native_args().to_vec();

    let target = if args.is_empty() {
        parent
    } else {
        parent
            .route(&args)
            .ok_or_else(|| CliError::CommandNotFound(args.join(" ")))?
    };
    let usage = target.usage(&ctx.color())?;
    ctx.string(usage)
}
