use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notifyr::config::Config;
use notifyr::notifier::Dispatcher;
use notifyr::outcome::{NodeState, RunOutcome};
use notifyr::transport::SendGridTransport;

#[derive(Parser, Debug)]
#[command(name = "notifyr")]
#[command(author, version, about = "A lightweight pipeline email notifier", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "notifyr.toml")]
    config: PathBuf,

    /// Outcome of the finished pipeline run
    #[arg(short, long, value_parser = ["success", "failure"])]
    status: String,

    /// Optional JSON file mapping node identifiers to terminal states
    #[arg(long)]
    node_states: Option<PathBuf>,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Notifyr v{}", env!("CARGO_PKG_VERSION"));

    let outcome = load_outcome(&cli)?;

    let transport = SendGridTransport::new(&config.transport)?;
    let dispatcher = Dispatcher::new(config.notification, Arc::new(transport));
    dispatcher.run(&outcome).await?;

    Ok(())
}

/// Assemble the run outcome from the command line and the optional
/// node-states file dropped by the pipeline runner.
fn load_outcome(cli: &Cli) -> Result<RunOutcome> {
    let mut outcome = RunOutcome::new(cli.status == "success");

    if let Some(path) = &cli.node_states {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read node states file: {}", path.display()))?;
        let states: HashMap<String, NodeState> =
            serde_json::from_str(&content).with_context(|| "Failed to parse node states file")?;
        outcome.node_states = states;
    }

    Ok(outcome)
}
