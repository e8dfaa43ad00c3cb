//! # Observability
//!
//! Tracing + Prometheus metrics for the binding host.
//!
//! ## Features
//!
//! - Tracing initialization (JSON/Pretty/Compact)
//! - Prometheus metrics exporter
//! - Invocation and output-delivery metric recorders
//! - In-memory aggregation for end-of-run summaries
//!
//! ## Example
//!
//! ```ignore
//! observability::init()?;
//!
//! let started = std::time::Instant::now();
//! let result = aggregator.handle(&request);
//! observability::record_invocation(result.http_response().status(), started.elapsed());
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use crate::metrics::{
    record_invocation, record_output_dispatched, record_output_written, record_queue_depth,
    InvocationMetricsAggregator, InvocationSummary, RunningStats, StatsSummary,
};

/// Initialize observability (Tracing + Prometheus) with defaults
///
/// - Tracing: JSON format, honours `RUST_LOG`
/// - Prometheus: listens on 0.0.0.0:9000
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log format
    pub log_format: LogFormat,
    /// Prometheus port (None = disabled)
    pub metrics_port: Option<u16>,
    /// Default log level when `RUST_LOG` is unset
    pub default_log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            metrics_port: Some(9000),
            default_log_level: "info".to_string(),
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON structured logs
    #[default]
    Json,
    /// Human-readable
    Pretty,
    /// Compact single line
    Compact,
}

/// Initialize with a custom configuration
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    init_tracing(config.log_format, &config.default_log_level)?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::info!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );

    Ok(())
}

/// Install the tracing subscriber only
///
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init_tracing(format: LogFormat, default_level: &str) -> Result<()> {
    install_subscriber(format, select_filter(env_directive(), default_level, false))
}

/// Install the tracing subscriber at exactly `level`, ignoring `RUST_LOG`
pub fn init_tracing_forced(format: LogFormat, level: &str) -> Result<()> {
    install_subscriber(format, select_filter(env_directive(), level, true))
}

fn env_directive() -> Option<String> {
    std::env::var(EnvFilter::DEFAULT_ENV).ok()
}

fn select_filter(env: Option<String>, level: &str, force: bool) -> EnvFilter {
    match env {
        Some(directive) if !force => {
            EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(level))
        }
        _ => EnvFilter::new(level),
    }
}

fn install_subscriber(format: LogFormat, filter: EnvFilter) -> Result<()> {
    use tracing_subscriber::Layer;

    let fmt_layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")
}

/// Install the Prometheus recorder only (no tracing)
///
/// For when tracing was already set up elsewhere.
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}
