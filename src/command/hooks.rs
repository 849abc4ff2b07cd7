//! Before/after hooks around a handler

use crate::context::Context;
use crate::error::CliResult;
use tracing::debug;

/// Run the routed command of `ctx`.
///
/// Before-hooks run root first down to the command, after-hooks in reverse.
/// The first error stops the chain.
pub(crate) fn dispatch(ctx: &mut Context<'_>) -> CliResult<()> {
    let command = ctx.command();
    if command.node().no_hook() {
        return invoke(ctx);
    }

    let chain = command.ancestry();
    for cmd in &chain {
        if let Some(hook) = cmd.node().before() {
            debug!(target: "argbind::app", command = cmd.name(), "before hook");
            hook(ctx)?;
        }
    }

    invoke(ctx)?;

    for cmd in chain.iter().rev() {
        if let Some(hook) = cmd.node().after() {
            debug!(target: "argbind::app", command = cmd.name(), "after hook");
            hook(ctx)?;
        }
    }
    Ok(())
}

fn invoke(ctx: &mut Context<'_>) -> CliResult<()> {
    let command = ctx.command();
    match command.node().handler() {
        Some(handler) => {
            debug!(target: "argbind::app", command = command.name(), "running handler");
            handler(ctx)
        }
        None => {
            let usage = ctx.usage()?;
            ctx.string(usage)
        }
    }
}
