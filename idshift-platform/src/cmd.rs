//! External command invocation

use idshift_core::{Error, Result};
use std::process::Command;
use tracing::debug;

/// Run a command to completion and return its stdout.
///
/// A non-zero exit status is an error carrying the command line and the
/// trimmed stderr, so failures name the tool that produced them.
pub(crate) fn run(program: &str, args: &[&str]) -> Result<String> {
    debug!(program, ?args, "running command");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| Error::command(format!("{}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::command(format!(
            "{} {} exited with {}: {}",
            program,
            args.join(" "),
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a command where a non-zero exit means "nothing there" rather
/// than failure. Returns `None` for both spawn errors and non-zero
/// exits.
pub(crate) fn run_optional(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}
