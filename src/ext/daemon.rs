//! Re-launching the running program as a background daemon
//!
//! The parent re-executes itself with the same arguments and waits for the
//! child's first line on stderr. A line starting with the agreed prefix means
//! the child is up; anything else is treated as its failure message.

use crate::context::Context;
use crate::error::{CliError, CliResult};
use std::io::{BufRead, BufReader};
use std::process::{Command as Process, Stdio};
use tracing::debug;

/// Start the running executable again with the invocation's native args.
///
/// On success the child's signal line is written to the context output and
/// the child keeps running detached.
pub fn daemon(ctx: &mut Context<'_>, success_prefix: &str) -> CliResult<()> {
    let exe = std::env::current_exe()?;
    let mut process = Process::new(exe);
    process.args(ctx.native_args());
    let line = launch(process, success_prefix)?;
    ctx.string(line)
}

/// Spawn `process` with a piped stderr and wait for its first line.
///
/// Returns the line when it starts with `success_prefix`. Otherwise the child
/// is killed and the line, without its newline, becomes the error.
pub fn launch(mut process: Process, success_prefix: &str) -> CliResult<String> {
    let mut child = process.stderr(Stdio::piped()).spawn()?;
    debug!(target: "argbind::ext", pid = child.id(), "daemon child started");

    let Some(stderr) = child.stderr.take() else {
        let _ = child.kill();
        return Err(CliError::DaemonError("daemon stderr unavailable".to_string()));
    };
    let mut line = String::new();
    let read = BufReader::new(stderr).read_line(&mut line);

    match read {
        Ok(n) if n > 0 && line.starts_with(success_prefix) => {
            debug!(target: "argbind::ext", pid = child.id(), "daemon child signalled success");
            Ok(line)
        }
        Ok(0) => {
            let _ = child.kill();
            let _ = child.wait();
            Err(CliError::DaemonError(
                "daemon exited without a response".to_string(),
            ))
        }
        Ok(_) => {
            debug!(target: "argbind::ext", pid = child.id(), "daemon child signalled failure");
            let _ = child.kill();
            let _ = child.wait();
            Err(CliError::DaemonError(line.trim_end_matches(['\r', '\n']).to_string()))
        }
        Err(err) => {
            let _ = child.kill();
            let _ = child.wait();
            Err(err.into())
        }
    }
}

/// Report the daemon's status line to the waiting parent
pub fn daemon_response(resp: &str) {
    eprintln!("{}", resp);
}
