use crate::utils::error::{InvoiceError, Result};
use std::process::Stdio;
use tokio::process::Command;

/// Runs `command` to completion and returns its stdout lines.
///
/// `display` is the command line reported in errors.
pub(crate) async fn run_captured(mut command: Command, display: &str) -> Result<Vec<String>> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = command.output().await?;

    if !output.status.success() {
        let status = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::debug!(status, stderr = %stderr.trim(), "command failed");
        return Err(InvoiceError::RemoteCommandError {
            command: display.to_string(),
            status,
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect())
}
