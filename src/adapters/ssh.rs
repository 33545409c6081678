use crate::adapters::process::run_captured;
use crate::domain::ports::RemoteExecutor;
use crate::utils::error::{InvoiceError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshSettings {
    pub host: String,
    pub user: Option<String>,
    pub port: u16,
    pub identity_file: Option<PathBuf>,
    pub connect_timeout: Duration,
}

impl SshSettings {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: None,
            port: 22,
            identity_file: None,
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user, self.host),
            None => self.host.clone(),
        }
    }

    /// Options shared by the master and every multiplexed command.
    ///
    /// BatchMode keeps ssh from prompting; authentication has to come from
    /// the agent or the identity file.
    pub fn base_args(&self) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs().max(1)),
            "-p".to_string(),
            self.port.to_string(),
        ];
        if let Some(identity) = &self.identity_file {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }
        args
    }
}

/// An open OpenSSH ControlMaster connection to the node host.
///
/// Commands are multiplexed over the master's control socket, so the
/// handshake happens once per session. Call [`SshSession::close`] when done;
/// dropping the session kills the master and removes the socket directory.
pub struct SshSession {
    settings: SshSettings,
    master: Mutex<Child>,
    socket: PathBuf,
    // 持有到 session 結束，drop 時刪除 socket 目錄
    _control_dir: TempDir,
}

impl SshSession {
    pub async fn open(settings: SshSettings) -> Result<Self> {
        Self::open_in(settings, &std::env::temp_dir()).await
    }

    /// Like [`SshSession::open`], with the control socket directory created
    /// under `control_parent`.
    pub(crate) async fn open_in(settings: SshSettings, control_parent: &Path) -> Result<Self> {
        // master 的等待時間多給一秒，讓 ssh 自己的 ConnectTimeout 先生效
        let wait = Instant::now()
            .checked_add(settings.connect_timeout)
            .and_then(|at| at.checked_add(Duration::from_secs(1)));
        let Some(deadline) = wait else {
            return Err(InvoiceError::SessionError {
                message: format!(
                    "connect timeout of {}s is out of range",
                    settings.connect_timeout.as_secs()
                ),
            });
        };

        let control_dir = tempfile::Builder::new()
            .prefix("ln-invoice-")
            .tempdir_in(control_parent)?;
        let socket = control_dir.path().join("ctl");
        let destination = settings.destination();

        tracing::debug!(destination = %destination, port = settings.port, "opening ssh session");

        let mut master = Command::new("ssh");
        master
            .args(settings.base_args())
            .args(["-M", "-N", "-o", "ControlPersist=no", "-S"])
            .arg(&socket)
            .arg(&destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = master.spawn().map_err(|e| InvoiceError::SessionError {
            message: format!("failed to start ssh: {}", e),
        })?;

        loop {
            if let Some(status) = child.try_wait()? {
                let mut stderr = String::new();
                if let Some(mut pipe) = child.stderr.take() {
                    pipe.read_to_string(&mut stderr).await?;
                }
                return Err(InvoiceError::SessionError {
                    message: format!(
                        "ssh to {} exited with {}: {}",
                        destination,
                        status,
                        stderr.trim()
                    ),
                });
            }

            if socket.exists() && Self::check(&settings, &socket).await {
                break;
            }

            if Instant::now() >= deadline {
                child.kill().await?;
                return Err(InvoiceError::SessionError {
                    message: format!("timed out connecting to {}", destination),
                });
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tracing::info!(destination = %destination, "ssh session established");

        Ok(Self {
            settings,
            master: Mutex::new(child),
            socket,
            _control_dir: control_dir,
        })
    }

    async fn check(settings: &SshSettings, socket: &Path) -> bool {
        let mut cmd = Command::new("ssh");
        cmd.arg("-S")
            .arg(socket)
            .args(["-O", "check"])
            .arg(settings.destination())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        matches!(cmd.status().await, Ok(status) if status.success())
    }

    pub fn settings(&self) -> &SshSettings {
        &self.settings
    }

    /// Asks the master to exit and waits for it.
    pub async fn close(self) -> Result<()> {
        let mut cmd = Command::new("ssh");
        cmd.arg("-S")
            .arg(&self.socket)
            .args(["-O", "exit"])
            .arg(self.settings.destination())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let exited = matches!(cmd.status().await, Ok(status) if status.success());

        let mut master = self.master.into_inner();
        if !exited {
            tracing::warn!("ssh master did not exit cleanly, killing it");
            master.kill().await?;
        }
        master.wait().await?;

        tracing::debug!(destination = %self.settings.destination(), "ssh session closed");
        Ok(())
    }
}

#[async_trait]
impl RemoteExecutor for SshSession {
    async fn execute(&self, command: &str) -> Result<Vec<String>> {
        let mut cmd = Command::new("ssh");
        cmd.args(self.settings.base_args())
            .arg("-S")
            .arg(&self.socket)
            .arg(self.settings.destination())
            .arg(command);
        run_captured(cmd, command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination() {
        let mut settings = SshSettings::new("node.local");
        assert_eq!(settings.destination(), "node.local");
        settings.user = Some("umbrel".to_string());
        assert_eq!(settings.destination(), "umbrel@node.local");
    }

    #[test]
    fn test_base_args() {
        let mut settings = SshSettings::new("node.local");
        settings.port = 2222;
        settings.identity_file = Some(PathBuf::from("/home/me/.ssh/id_node"));

        let args = settings.base_args();
        assert!(args.windows(2).any(|w| w == ["-p", "2222"]));
        assert!(args.windows(2).any(|w| w == ["-i", "/home/me/.ssh/id_node"]));
        assert!(args.windows(2).any(|w| w == ["-o", "BatchMode=yes"]));
        assert!(args.windows(2).any(|w| w == ["-o", "ConnectTimeout=10"]));
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_open_refused_cleans_up_control_dir() {
        let parent = TempDir::new().unwrap();
        let mut settings = SshSettings::new("127.0.0.1");
        settings.port = 1;
        settings.connect_timeout = Duration::from_secs(1);

        let result = SshSession::open_in(settings, parent.path()).await;

        assert!(matches!(result, Err(InvoiceError::SessionError { .. })));
        assert_eq!(entries(parent.path()), 0);
    }

    #[tokio::test]
    async fn test_open_with_unbounded_timeout_is_an_error() {
        let parent = TempDir::new().unwrap();
        let mut settings = SshSettings::new("127.0.0.1");
        settings.connect_timeout = Duration::from_secs(u64::MAX);

        let err = SshSession::open_in(settings, parent.path())
            .await
            .err()
            .unwrap();

        assert!(
            matches!(err, InvoiceError::SessionError { ref message } if message.contains("out of range"))
        );
        assert_eq!(entries(parent.path()), 0);
    }
}
