// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, describe how to build the API
//   client, and hand it to the command handler.
// - Returns `anyhow::Result` to simplify error handling at the edge.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use uptime_cli::commands::{run, Cli};
use uptime_cli::config::{debug_enabled, persist_api_key, Settings};
use uptime_cli::error::UptimeError;
use uptime_cli::{ui, LazyClient, UptimeRobot};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let verbose = cli.verbose || debug_enabled();

    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // The client (and the API key lookup) is only built once a command
    // actually needs it.
    let client = LazyClient::new(move || {
        let mut settings = Settings::from_env();
        settings.verbose = verbose;
        if !settings.has_api_key() && ui::is_interactive() {
            let key = ui::prompt_api_key().map_err(|e| UptimeError::Config(e.to_string()))?;
            if !key.is_empty() {
                persist_api_key(&key)?;
                settings.api_key = key;
            }
        }
        UptimeRobot::new(settings)
    });

    run(cli.command, &client).context("uptime command failed")?;
    Ok(())
}
