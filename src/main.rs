//! research-sync - client for the research assistant API
//!
#![doc = "research-sync - client for the research assistant API"]
#![doc = "Main entry point for the research-sync command-line client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use research_sync::cli::Cli;
use research_sync::commands;
use research_sync::config::Config;
use research_sync::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let app = AppState::from_config(&config)?;
    app.initialize();

    commands::dispatch(&app, cli.command).await
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
/// Logs go to stderr so command output stays pipeable.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose {
        "research_sync=debug"
    } else {
        "research_sync=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
