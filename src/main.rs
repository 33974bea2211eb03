use anyhow::Result;
use clap::Parser;

use adlab_hub::cli::commands::{
    replay::ReplayCommand, show_usage, tier::TierCommand, verify::VerifyCommand, Command,
};
use adlab_hub::cli::{Cli, Commands};
use adlab_hub::config::AdlabConfig;
use adlab_hub::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_file = AdlabConfig::load_env_file();
    let config = AdlabConfig::load(cli.config.as_deref())?;
    init_telemetry(&config.observability)?;

    match env_file {
        Ok(true) => tracing::info!("Loaded environment variables from .env file"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }
    tracing::debug!(
        tiers = config.commission.tiers.len(),
        config_file = ?cli.config,
        "Configuration loaded"
    );

    let runtime = tokio::runtime::Runtime::new()?;
    match cli.command {
        None => {
            show_usage();
            Ok(())
        }
        Some(Commands::Tier { contracts }) => {
            let command = TierCommand::new(contracts, config.commission.resolver());
            runtime.block_on(command.execute())
        }
        Some(Commands::Verify { json }) => {
            let command = VerifyCommand::new(
                config.commission.tiers.clone(),
                config.commission.expected.clone(),
                json,
            );
            runtime.block_on(command.execute())
        }
        Some(Commands::Replay { events }) => {
            let command = ReplayCommand::new(events, config.notifications.channel_capacity);
            runtime.block_on(command.execute())
        }
    }
}
