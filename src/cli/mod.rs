use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "adlab")]
#[command(about = "AdLab Hub commission tiers and contact pipeline")]
#[command(long_about = "AdLab Hub resolves freelancer commission tiers, audits the tier \
                       configuration and replays contact pipeline events. Start with \
                       'adlab tier --contracts 12' to see a payout.")]
pub struct Cli {
    /// Configuration file layered over ./adlab.toml
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the commission tier and payout for a contract count
    Tier {
        /// Validated contracts in the period
        #[arg(long, help = "Number of validated contracts in the period")]
        contracts: u32,
    },
    /// Audit the configured commission tiers against expected bands
    Verify {
        /// Print the report as JSON
        #[arg(long, help = "Emit the verification report as JSON")]
        json: bool,
    },
    /// Replay contact events from a JSON file through the status pipeline
    Replay {
        /// JSON file with "contacts" and "events"
        #[arg(long, help = "JSON file holding seed contacts and raw events")]
        events: PathBuf,
    },
}
