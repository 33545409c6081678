use crate::core::client::{ClientSettings, DEFAULT_EXPIRY_SECONDS};
use crate::core::command::DEFAULT_LNCLI;
use crate::core::memo::MEMO_MAX_BYTES;
use crate::utils::error::{InvoiceError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound for invoice expiry, one year in seconds.
pub const MAX_EXPIRY_SECONDS: u64 = 365 * 24 * 60 * 60;
pub const MAX_CONNECT_TIMEOUT_SECONDS: u64 = 600;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub node: NodeConfig,
    pub invoice: InvoiceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub host: Option<String>,
    pub user: Option<String>,
    pub port: u16,
    pub identity_file: Option<PathBuf>,
    /// Run lncli on this machine instead of over SSH.
    pub local: bool,
    pub lncli_command: String,
    pub connect_timeout_seconds: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: None,
            user: None,
            port: 22,
            identity_file: None,
            local: false,
            lncli_command: DEFAULT_LNCLI.to_string(),
            connect_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    pub default_expiry_seconds: u64,
    pub memo_max_bytes: usize,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            default_expiry_seconds: DEFAULT_EXPIRY_SECONDS,
            memo_max_bytes: MEMO_MAX_BYTES,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| InvoiceError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InvoiceError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LND_HOST})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| InvoiceError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            lncli: self.node.lncli_command.clone(),
            memo_max_bytes: self.invoice.memo_max_bytes,
            default_expiry: self.invoice.default_expiry_seconds,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(host) = &self.node.host {
            validation::validate_host("node.host", host)?;
        }
        if let Some(user) = &self.node.user {
            validation::validate_user("node.user", user)?;
        }
        validation::validate_range("node.port", self.node.port, 1, u16::MAX)?;
        if let Some(identity) = &self.node.identity_file {
            validation::validate_path("node.identity_file", identity)?;
        }
        validation::validate_non_empty_string("node.lncli_command", &self.node.lncli_command)?;
        validation::validate_range(
            "node.connect_timeout_seconds",
            self.node.connect_timeout_seconds,
            1,
            MAX_CONNECT_TIMEOUT_SECONDS,
        )?;
        validation::validate_range(
            "invoice.default_expiry_seconds",
            self.invoice.default_expiry_seconds,
            1,
            MAX_EXPIRY_SECONDS,
        )?;
        validation::validate_range(
            "invoice.memo_max_bytes",
            self.invoice.memo_max_bytes,
            1,
            MEMO_MAX_BYTES,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[node]
host = "umbrel.local"
user = "umbrel"
port = 2222
lncli_command = "docker exec lnd lncli"

[invoice]
default_expiry_seconds = 600
memo_max_bytes = 200

[logging]
level = "debug"
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.node.host.as_deref(), Some("umbrel.local"));
        assert_eq!(config.node.port, 2222);
        assert_eq!(config.node.connect_timeout_seconds, 10);
        assert!(config.logging.json);

        let settings = config.client_settings();
        assert_eq!(settings.lncli, "docker exec lnd lncli");
        assert_eq!(settings.default_expiry, 600);
        assert_eq!(settings.memo_max_bytes, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.client_settings(), ClientSettings::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LN_INVOICE_TEST_HOST", "10.0.0.7");

        let config = TomlConfig::from_toml_str(
            r#"
[node]
host = "${LN_INVOICE_TEST_HOST}"
user = "${LN_INVOICE_TEST_UNSET_USER}"
"#,
        )
        .unwrap();

        assert_eq!(config.node.host.as_deref(), Some("10.0.0.7"));
        assert_eq!(
            config.node.user.as_deref(),
            Some("${LN_INVOICE_TEST_UNSET_USER}")
        );
    }

    #[test]
    fn test_validation_rejects_out_of_range_values() {
        let mut config = TomlConfig::default();
        config.invoice.memo_max_bytes = MEMO_MAX_BYTES + 1;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.invoice.default_expiry_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.node.host = Some("-oProxyCommand=sh".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = TomlConfig::from_toml_str("[node\nhost = 1").unwrap_err();
        assert!(matches!(err, InvoiceError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[node]\nlocal = true\nlncli_command = \"lncli --network=testnet\"").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert!(config.node.local);
        assert_eq!(config.node.lncli_command, "lncli --network=testnet");

        assert!(TomlConfig::from_file("/nonexistent/ln-invoice.toml").is_err());
    }
}
