#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::SshSettings;
use crate::core::client::ClientSettings;
use crate::utils::error::Result;
use crate::utils::output::OutputFormat;
use crate::utils::validation::{self, Validate};

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::TomlConfig;

/// How lncli is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Local,
    Ssh(SshSettings),
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub transport: Transport,
    pub client: ClientSettings,
    pub format: OutputFormat,
    pub verbose: bool,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        if let Transport::Ssh(ssh) = &self.transport {
            validation::validate_host("node.host", &ssh.host)?;
            if let Some(user) = &ssh.user {
                validation::validate_user("node.user", user)?;
            }
            validation::validate_range("node.port", ssh.port, 1, u16::MAX)?;
            if let Some(identity) = &ssh.identity_file {
                validation::validate_path("node.identity_file", identity)?;
            }
            validation::validate_range(
                "node.connect_timeout_seconds",
                ssh.connect_timeout.as_secs(),
                1,
                toml_config::MAX_CONNECT_TIMEOUT_SECONDS,
            )?;
        }
        validation::validate_non_empty_string("node.lncli_command", &self.client.lncli)?;
        validation::validate_range(
            "invoice.default_expiry_seconds",
            self.client.default_expiry,
            1,
            toml_config::MAX_EXPIRY_SECONDS,
        )?;
        validation::validate_range(
            "invoice.memo_max_bytes",
            self.client.memo_max_bytes,
            1,
            crate::core::memo::MEMO_MAX_BYTES,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::InvoiceError;
    use std::time::Duration;

    fn ssh_config(settings: SshSettings) -> AppConfig {
        AppConfig {
            transport: Transport::Ssh(settings),
            client: ClientSettings::default(),
            format: OutputFormat::default(),
            verbose: false,
            log_level: None,
            json_logs: false,
        }
    }

    fn rejected_field(config: &AppConfig) -> String {
        match config.validate().unwrap_err() {
            InvoiceError::ConfigValidationError { field, .. }
            | InvoiceError::InvalidConfigValueError { field, .. } => field,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_valid_ssh_config() {
        let mut settings = SshSettings::new("umbrel.local");
        settings.user = Some("umbrel".to_string());
        assert!(ssh_config(settings).validate().is_ok());
    }

    #[test]
    fn test_connect_timeout_out_of_range() {
        let mut settings = SshSettings::new("umbrel.local");
        settings.connect_timeout = Duration::from_secs(u64::MAX);
        assert_eq!(
            rejected_field(&ssh_config(settings.clone())),
            "node.connect_timeout_seconds"
        );

        settings.connect_timeout = Duration::ZERO;
        assert_eq!(
            rejected_field(&ssh_config(settings)),
            "node.connect_timeout_seconds"
        );
    }

    #[test]
    fn test_user_cannot_smuggle_ssh_options() {
        let mut settings = SshSettings::new("umbrel.local");
        settings.user = Some("-oProxyCommand=touch /tmp/x".to_string());
        assert_eq!(rejected_field(&ssh_config(settings)), "node.user");
    }

    #[test]
    fn test_local_transport_skips_ssh_checks() {
        let config = AppConfig {
            transport: Transport::Local,
            ..ssh_config(SshSettings::new(""))
        };
        assert!(config.validate().is_ok());
    }
}
