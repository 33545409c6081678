use crate::adapters::process::run_captured;
use crate::domain::ports::RemoteExecutor;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::process::Command;

/// Runs commands through `sh -c` on this machine, for nodes that share the
/// host with the client.
#[derive(Debug, Clone, Default)]
pub struct LocalShell;

impl LocalShell {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RemoteExecutor for LocalShell {
    async fn execute(&self, command: &str) -> Result<Vec<String>> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        run_captured(cmd, command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::InvoiceError;

    #[tokio::test]
    async fn test_captures_stdout_lines() {
        let lines = LocalShell::new()
            .execute("printf '{\\n  \"state\": \"OPEN\"\\n}\\n'")
            .await
            .unwrap();
        assert_eq!(lines, vec!["{", "  \"state\": \"OPEN\"", "}"]);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_an_error() {
        let err = LocalShell::new()
            .execute("echo 'unable to locate invoice' >&2; exit 3")
            .await
            .unwrap_err();
        match err {
            InvoiceError::RemoteCommandError { status, stderr, .. } => {
                assert_eq!(status, 3);
                assert!(stderr.contains("unable to locate invoice"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
