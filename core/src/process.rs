//! Analyzer subprocess execution.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::InvokeError;
use crate::invocation::Invocation;

/// Options that control how the child is run, independent of its arguments.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunOptions {
    pub merge_stderr: bool,
    pub timeout: Option<Duration>,
}

/// Run `invocation` to completion and return its captured text.
///
/// The exit status is not inspected: the analyzer exits non-zero whenever it
/// reports errors, and its output is still meaningful. Output is decoded
/// lossily. With `merge_stderr`, stderr is appended after stdout.
pub(crate) async fn run(invocation: &Invocation, options: RunOptions) -> Result<String, InvokeError> {
    let program = invocation.program();
    let resolved = which::which(program).map_err(|source| InvokeError::NotFound {
        executable: program.to_string(),
        source,
    })?;

    let mut cmd = Command::new(&resolved);
    cmd.args(invocation.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(if options.merge_stderr {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .kill_on_drop(true);

    tracing::debug!(command = %invocation, "Spawning analyzer");
    let child = cmd.spawn().map_err(|source| InvokeError::Spawn {
        executable: program.to_string(),
        source,
    })?;

    let output = match options.timeout {
        // Dropping the pending future drops the child, which kills it.
        Some(after) => tokio::time::timeout(after, child.wait_with_output())
            .await
            .map_err(|_| InvokeError::TimedOut {
                executable: program.to_string(),
                after,
            })?,
        None => child.wait_with_output().await,
    }
    .map_err(|source| InvokeError::Read { source })?;

    tracing::debug!(
        status = %output.status,
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "Analyzer finished"
    );

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if options.merge_stderr && !output.stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(&output.stderr));
    }
    Ok(text)
}
