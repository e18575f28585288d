//! spancheck CLI entrypoint

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use spancheck::cli::Cli;
use spancheck::config;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref());

    // Initialize tracing on stderr; stdout carries the accepted records
    let level = cli.log_level(config.as_ref().ok());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    match config.and_then(|config| cli.execute(&config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
