pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::notify::TerminalNotifier;
use crate::core::{ConversionController, ExchangeRateProvider, NotificationSink};
use crate::providers::ExchangeRateApiProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Currencies,
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Interactive,
}

/// Wires the configured provider and notifier into a controller.
pub fn build_controller(
    config: &AppConfig,
    notifier: Arc<dyn NotificationSink>,
) -> Result<ConversionController> {
    let currencies = Arc::new(config.currency_table()?);
    let provider: Arc<dyn ExchangeRateProvider> =
        Arc::new(ExchangeRateApiProvider::new(&config.provider.base_url));

    ConversionController::new(
        currencies,
        provider,
        notifier,
        &config.default_from,
        &config.default_to,
    )
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let notifier = Arc::new(TerminalNotifier::new(config.notifications.enabled));

    match command {
        AppCommand::Currencies => cli::currencies::run(&config),
        AppCommand::Convert { amount, from, to } => {
            let controller = build_controller(&config, notifier)?;
            cli::convert::run(&controller, &amount, from.as_deref(), to.as_deref()).await
        }
        AppCommand::Interactive => {
            let controller = build_controller(&config, notifier)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::interactive::run(&controller, stdin).await
        }
    }
}
