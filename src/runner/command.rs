//! Command execution
//!
//! The rendered submission text is split into words with shell rules and
//! run directly, without an intermediate shell.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::Context;
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use tracing::{info, warn};

/// Split rendered text into program and arguments
pub fn split_command(rendered: &str) -> ExecutionResult<Vec<String>> {
    let words = shlex::split(rendered).ok_or_else(|| {
        ExecutionError::Tokenize("unbalanced quotes or trailing escape".to_string())
    })?;

    if words.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }
    Ok(words)
}

/// Shell-escaped single-line form of a word list, for display
pub fn display_command(words: &[String]) -> String {
    shlex::try_join(words.iter().map(String::as_str)).unwrap_or_else(|_| words.join(" "))
}

/// Run the rendered submission in the given context
///
/// Returns `None` in dry-run mode. A non-zero exit status is logged but not
/// treated as an error.
pub fn execute_submission(rendered: &str, ctx: &Context) -> ExecutionResult<Option<ExitStatus>> {
    let words = split_command(rendered)?;

    if ctx.dry_run {
        println!("{}", display_command(&words));
        return Ok(None);
    }

    let program = &words[0];
    info!(command = %display_command(&words), "submitting job");

    let status = StdCommand::new(program)
        .args(&words[1..])
        .current_dir(&ctx.working_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| ExecutionError::Spawn {
            program: program.clone(),
            error: e.to_string(),
        })?;

    if status.success() {
        info!("submission command finished");
    } else {
        warn!(code = ?status.code(), "submission command exited unsuccessfully");
    }

    Ok(Some(status))
}
