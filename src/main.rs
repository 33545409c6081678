use anyhow::Context;
use clap::Parser;
use ln_invoice::app::{run_action, Action};
use ln_invoice::utils::error::{ErrorSeverity, InvoiceError};
use ln_invoice::utils::{logger, validation::Validate};
use ln_invoice::{AppConfig, CliConfig, InvoiceClient, LocalShell, SshSession, Transport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入設定檔並套用命令列覆蓋
    let config = match cli.load_file().and_then(|file| cli.resolve(file)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.json_logs {
        logger::init_json_logger(config.verbose, config.log_level.as_deref());
    } else {
        logger::init_cli_logger(config.verbose, config.log_level.as_deref());
    }
    tracing::debug!("resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let action = Action::from(cli.command.clone());
    match run(&config, &action).await? {
        Ok(output) => {
            println!("{}", output.trim_end());
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "{} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}

/// Opens the session, runs the action and always closes the session again.
///
/// The outer error is reserved for failures to release the session.
async fn run(
    config: &AppConfig,
    action: &Action,
) -> anyhow::Result<Result<String, InvoiceError>> {
    let client = InvoiceClient::new(config.client.clone());

    match &config.transport {
        Transport::Local => Ok(run_action(&client, &LocalShell::new(), action, config.format).await),
        Transport::Ssh(settings) => {
            let session = match SshSession::open(settings.clone()).await {
                Ok(session) => session,
                Err(e) => return Ok(Err(e)),
            };
            let result = run_action(&client, &session, action, config.format).await;
            session
                .close()
                .await
                .with_context(|| format!("closing ssh session to {}", settings.destination()))?;
            Ok(result)
        }
    }
}
