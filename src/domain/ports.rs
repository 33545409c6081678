use crate::utils::error::Result;
use async_trait::async_trait;

/// A channel that can run one shell command on the node host.
///
/// Implementations return the captured stdout split into lines. A non-zero
/// exit status is reported as `InvoiceError::RemoteCommandError`.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn execute(&self, command: &str) -> Result<Vec<String>>;
}
