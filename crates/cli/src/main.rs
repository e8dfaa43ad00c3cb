//! # Binding Host CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Config loading and validation
//! - HTTP host lifecycle with graceful shutdown
//! - Local invocations without a listener

mod cli;
mod commands;
mod error;
mod host;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_invoke, run_serve, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Binding host CLI starting"
    );

    let result = match &cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Invoke(args) => run_invoke(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
///
/// `--quiet` pins the level to warn even when `RUST_LOG` is set.
fn init_logging(cli: &Cli) -> Result<()> {
    let format = match cli.log_format {
        cli::LogFormat::Json => observability::LogFormat::Json,
        cli::LogFormat::Pretty => observability::LogFormat::Pretty,
        cli::LogFormat::Compact => observability::LogFormat::Compact,
    };

    let (level, forced) = log_level(cli);
    if forced {
        observability::init_tracing_forced(format, level)
    } else {
        observability::init_tracing(format, level)
    }
}

fn log_level(cli: &Cli) -> (&'static str, bool) {
    if cli.quiet {
        return ("warn", true);
    }
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    (level, false)
}
