//! Host assembly shared by `serve` and `invoke`.

mod stats;

pub use stats::HostStats;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use contracts::{FunctionBlueprint, FunctionConfig, SinkOutputs};
use dispatcher::{create_dispatcher, DispatcherSummary, ResultAggregator};
use synthesizer::{RecordSynthesizer, SystemClock, UuidGenerator};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::CliError;

/// Load and validate the blueprint at `path`
pub fn load_blueprint(path: &Path) -> Result<FunctionBlueprint> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }

    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Production aggregator: random ids, wall clock
pub fn build_aggregator(function: &FunctionConfig) -> ResultAggregator {
    let synthesizer = RecordSynthesizer::new(Arc::new(UuidGenerator))
        .with_partition_key(function.partition_key.as_str());
    ResultAggregator::new(synthesizer, Arc::new(SystemClock))
}

/// Running output side of the host
pub struct Outputs {
    pub tx: mpsc::Sender<SinkOutputs>,
    pub dispatcher: JoinHandle<DispatcherSummary>,
}

impl Outputs {
    /// Close the queue and wait for every sink to drain
    pub async fn finish(self) -> Result<DispatcherSummary> {
        drop(self.tx);
        self.dispatcher
            .await
            .map_err(|e| anyhow::Error::from(CliError::sink_setup(format!("dispatcher task failed: {e}"))))
    }
}

/// Spawn the dispatcher with one worker per configured output
pub async fn start_outputs(blueprint: &FunctionBlueprint) -> Result<Outputs> {
    if blueprint.outputs.is_empty() {
        warn!("No outputs configured - sink payloads will be discarded");
    }

    let (tx, rx) = mpsc::channel(blueprint.server.output_buffer);
    let dispatcher = create_dispatcher(blueprint.outputs.clone(), rx)
        .await
        .map_err(|e| CliError::sink_setup(e.to_string()))?;

    info!(outputs = blueprint.outputs.len(), "Output sinks started");

    Ok(Outputs {
        tx,
        dispatcher: dispatcher.spawn(),
    })
}
