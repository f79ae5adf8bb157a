//! Outbox CLI - Command-line interface for the offline-first submission buffer
//!
//! Provides commands for:
//! - Submitting payloads (with durable local fallback)
//! - Inspecting the pending queue
//! - Draining the queue manually
//! - Combined remote/local status
//! - Watching connectivity and reconciling automatically

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    drain::DrainCommand, pending::PendingCommand, purge::PurgeCommand, status::StatusCommand,
    submit::SubmitCommand, watch::WatchCommand,
};
use outbox_core::config::Config;

#[derive(Debug, Parser)]
#[command(name = "outbox", version, about = "Offline-first submission buffer")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Submit a payload, queuing it locally when delivery fails
    Submit(SubmitCommand),
    /// List locally queued submissions
    Pending(PendingCommand),
    /// Run one drain pass over the pending queue
    Drain(DrainCommand),
    /// Show combined remote and local submission status
    Status(StatusCommand),
    /// Drop every locally queued submission
    Purge(PurgeCommand),
    /// Watch connectivity and reconcile the queue automatically
    Watch(WatchCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    let validation_errors = config.validate();
    if !validation_errors.is_empty() {
        for error in &validation_errors {
            eprintln!("config error: {error}");
        }
        bail!(
            "invalid configuration at {} ({} error(s))",
            config_path.display(),
            validation_errors.len()
        );
    }

    init_tracing(cli.verbose, &config.logging.level);

    match cli.command {
        Commands::Submit(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Pending(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Drain(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Status(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Purge(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Watch(cmd) => cmd.execute(&config).await,
    }
}

/// Install the tracing subscriber.
///
/// `-v` flags escalate the default level; an explicit `RUST_LOG` wins over
/// both the flags and the configured level.
fn init_tracing(verbose: u8, configured_level: &str) {
    let default_level = match verbose {
        0 => configured_level,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
