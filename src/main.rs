// skicka: drop files onto a machine over http
// main entry point with minimal bootstrap logic

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use skicka::config::{bootstrap_logging, load_configuration, render_configuration, Cli};
use skicka::logging::build_subscriber;
use skicka::server::start_server;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // parse command line arguments and environment
    let cli = Cli::parse();

    // load and merge configuration from file and cli
    let config = match load_configuration(&cli) {
        Ok(config) => config,
        Err(err) => {
            // no file settings yet, so report through the cli/env logger
            let subscriber = build_subscriber(&bootstrap_logging(&cli), cli.verbose, cli.quiet);
            tracing::subscriber::with_default(subscriber, || {
                error!(error = %format!("{err:#}"), "unable to load configuration");
            });
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.print_config {
        print!("{}", render_configuration(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    // install the logger built from the final configuration
    let subscriber = build_subscriber(&config.logging, cli.verbose, cli.quiet);
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install logger")?;
    info!(format = ?config.logging.format, "logging initialized");

    // serve until the listener fails
    if let Err(err) = start_server(config).await {
        error!(error = %format!("{err:#}"), "server stopped");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
