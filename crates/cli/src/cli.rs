//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Binding Host - runs an HTTP-triggered function with document and blob outputs
#[derive(Parser, Debug)]
#[command(
    name = "binding-host",
    author,
    version,
    about = "Host for an HTTP-triggered function with output bindings",
    long_about = "Serves an HTTP-triggered function that answers every GET with a welcome \n\
                  message and hands a document and a blob payload to the configured \n\
                  output sinks."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BINDING_HOST_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "BINDING_HOST_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the function over HTTP until interrupted
    Serve(ServeArgs),

    /// Run invocations locally and print the replies
    Invoke(InvokeArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `serve` command
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "binding-host.toml",
        env = "BINDING_HOST_CONFIG"
    )]
    pub config: PathBuf,

    /// Override bind address from configuration
    #[arg(long, env = "BINDING_HOST_HOST")]
    pub host: Option<String>,

    /// Override bind port from configuration
    #[arg(long, env = "BINDING_HOST_PORT")]
    pub port: Option<u16>,

    /// Override request timeout in seconds
    #[arg(long, env = "BINDING_HOST_REQUEST_TIMEOUT")]
    pub request_timeout: Option<u64>,

    /// Validate configuration and exit without serving
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "BINDING_HOST_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `invoke` command
#[derive(Parser, Debug, Clone)]
pub struct InvokeArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "binding-host.toml",
        env = "BINDING_HOST_CONFIG"
    )]
    pub config: PathBuf,

    /// Number of invocations to run
    #[arg(short = 'n', long, default_value = "1")]
    pub count: u64,

    /// Print only the summary, not each reply
    #[arg(long)]
    pub summary_only: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "binding-host.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "binding-host.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show output sink parameters
    #[arg(long)]
    pub outputs: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
