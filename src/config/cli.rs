use crate::adapters::SshSettings;
use crate::app::Action;
use crate::config::{AppConfig, TomlConfig, Transport};
use crate::domain::amount::MilliSatoshis;
use crate::domain::model::AddInvoiceRequest;
use crate::utils::error::Result;
use crate::utils::output::OutputFormat;
use crate::utils::validation::{validate_required_field, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "ln-invoice")]
#[command(about = "Create and look up Lightning invoices on an LND node through lncli")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Node host to reach over SSH
    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub user: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    #[arg(long)]
    pub identity_file: Option<PathBuf>,

    /// Run lncli on this machine instead of over SSH
    #[arg(long)]
    pub local: bool,

    /// How lncli is invoked on the node, e.g. "docker exec lnd lncli"
    #[arg(long)]
    pub lncli: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an invoice
    Add {
        /// Amount in satoshis, fractions allowed down to msat
        #[arg(long)]
        amount: MilliSatoshis,

        #[arg(long, default_value = "")]
        memo: String,

        /// Expiry in seconds
        #[arg(long)]
        expiry: Option<u64>,
    },
    /// Show an invoice by payment hash
    Lookup { r_hash: String },
    /// Print only the state of an invoice
    State { r_hash: String },
}

impl From<Command> for Action {
    fn from(command: Command) -> Self {
        match command {
            Command::Add {
                amount,
                memo,
                expiry,
            } => Action::Add(AddInvoiceRequest {
                amount,
                memo,
                expiry,
            }),
            Command::Lookup { r_hash } => Action::Lookup { r_hash },
            Command::State { r_hash } => Action::State { r_hash },
        }
    }
}

impl CliConfig {
    /// Loads and validates `--config` if given, otherwise built-in defaults.
    pub fn load_file(&self) -> Result<TomlConfig> {
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        file.validate()?;
        Ok(file)
    }

    /// 命令列參數優先於設定檔
    pub fn resolve(&self, file: TomlConfig) -> Result<AppConfig> {
        let mut client = file.client_settings();
        if let Some(lncli) = &self.lncli {
            client.lncli = lncli.clone();
        }

        let transport = if self.local || file.node.local {
            Transport::Local
        } else {
            let host = self.host.clone().or(file.node.host.clone());
            let host = validate_required_field("node.host", &host)?;
            Transport::Ssh(SshSettings {
                host: host.clone(),
                user: self.user.clone().or(file.node.user.clone()),
                port: self.port.unwrap_or(file.node.port),
                identity_file: self.identity_file.clone().or(file.node.identity_file.clone()),
                connect_timeout: Duration::from_secs(file.node.connect_timeout_seconds),
            })
        };

        Ok(AppConfig {
            transport,
            client,
            format: self.format,
            verbose: self.verbose,
            log_level: file.logging.level.clone(),
            json_logs: self.json_logs || file.logging.json,
        })
    }
}
