//! Dispatcher - main loop for fan-out to sinks
//!
//! Receives the sink payloads of each finished invocation and routes every present
//! payload to each sink bound to its kind. Empty payload sets (failed invocations)
//! are skipped without touching any sink.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use contracts::{OutputKind, SinkConfig, SinkOutput, SinkOutputs, SinkType};

use crate::error::DispatcherError;
use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{BlobStoreSink, DocumentStoreSink, LogSink};

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Sink configurations
    pub sinks: Vec<SinkConfig>,
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    input_rx: mpsc::Receiver<SinkOutputs>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(config: DispatcherConfig, input_rx: mpsc::Receiver<SinkOutputs>) -> Self {
        Self { config, input_rx }
    }

    /// Build the dispatcher, spawning one worker per sink
    #[instrument(name = "dispatcher_builder_build", skip(self))]
    pub async fn build(self) -> Result<Dispatcher, DispatcherError> {
        let handles = Self::initialize_handles(&self.config)?;

        Ok(Dispatcher {
            handles,
            input_rx: self.input_rx,
        })
    }

    #[instrument(
        name = "dispatcher_initialize_handles",
        skip(config),
        fields(sink_count = config.sinks.len())
    )]
    fn initialize_handles(config: &DispatcherConfig) -> Result<Vec<SinkHandle>, DispatcherError> {
        config.sinks.iter().map(create_sink_handle).collect()
    }
}

/// Create a SinkHandle from configuration
#[instrument(
    name = "dispatcher_create_sink_handle",
    skip(config),
    fields(sink = %config.name, binding = %config.binding, sink_type = ?config.sink_type)
)]
fn create_sink_handle(config: &SinkConfig) -> Result<SinkHandle, DispatcherError> {
    match (config.binding, config.sink_type) {
        (kind, SinkType::Log) => {
            let sink = LogSink::new(&config.name, kind);
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
        (OutputKind::Document, SinkType::File) => {
            let sink = DocumentStoreSink::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
        (OutputKind::Blob, SinkType::File) => {
            let sink = BlobStoreSink::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
    }
}

/// Final counters reported when the dispatcher stops
#[derive(Debug, Clone, Default)]
pub struct DispatcherSummary {
    /// Payload sets received from invocations
    pub received: u64,
    /// Payload sets skipped because they were empty
    pub skipped: u64,
    /// Per-sink counters after all queues drained
    pub sinks: Vec<(String, MetricsSnapshot)>,
}

/// The main Dispatcher that fans out sink payloads
pub struct Dispatcher {
    handles: Vec<SinkHandle>,
    input_rx: mpsc::Receiver<SinkOutputs>,
}

impl Dispatcher {
    /// Create a dispatcher with custom sink handles (for testing)
    pub fn with_handles(handles: Vec<SinkHandle>, input_rx: mpsc::Receiver<SinkOutputs>) -> Self {
        Self { handles, input_rx }
    }

    /// Run the dispatcher main loop
    ///
    /// Returns when the input channel is closed and every sink has drained.
    #[instrument(name = "dispatcher_run", skip(self))]
    pub async fn run(mut self) -> DispatcherSummary {
        info!(sinks = self.handles.len(), "Dispatcher started");

        let mut summary = DispatcherSummary::default();

        while let Some(outputs) = self.input_rx.recv().await {
            summary.received += 1;

            if outputs.is_empty() {
                summary.skipped += 1;
                debug!("Invocation produced no sink outputs, skipped");
                continue;
            }

            let queued = self.dispatch_outputs(&outputs);
            debug!(queued, sinks = self.handles.len(), "Outputs dispatched");

            if summary.received.is_multiple_of(100) {
                debug!(received = summary.received, "Dispatcher progress");
            }
        }

        info!(
            received = summary.received,
            skipped = summary.skipped,
            "Dispatcher input closed, shutting down"
        );

        let metrics: Vec<_> = self
            .handles
            .iter()
            .map(|h| (h.name().to_string(), std::sync::Arc::clone(h.metrics())))
            .collect();

        Self::shutdown_handles(self.handles).await;

        summary.sinks = metrics
            .into_iter()
            .map(|(name, m)| (name, m.snapshot()))
            .collect();

        info!("Dispatcher shutdown complete");
        summary
    }

    /// Spawn the dispatcher as a background task
    pub fn spawn(self) -> JoinHandle<DispatcherSummary> {
        tokio::spawn(self.run())
    }

    /// Queue each present payload on every sink bound to its kind
    ///
    /// Returns the number of payloads queued.
    fn dispatch_outputs(&self, outputs: &SinkOutputs) -> usize {
        let mut queued = 0;

        for handle in &self.handles {
            let payload = match handle.kind() {
                OutputKind::Document => outputs.document.clone().map(SinkOutput::Document),
                OutputKind::Blob => outputs.blob.clone().map(SinkOutput::Blob),
            };

            if let Some(payload) = payload {
                let sent = handle.try_send(payload);
                observability::record_output_dispatched(handle.name(), sent);
                if sent {
                    queued += 1;
                }
            }
        }

        queued
    }

    async fn shutdown_handles(handles: Vec<SinkHandle>) {
        for handle in handles {
            handle.shutdown().await;
        }
    }
}

/// Convenience function to create a dispatcher from sink configs
#[instrument(name = "dispatcher_create", skip(sink_configs, input_rx))]
pub async fn create_dispatcher(
    sink_configs: Vec<SinkConfig>,
    input_rx: mpsc::Receiver<SinkOutputs>,
) -> Result<Dispatcher, DispatcherError> {
    let config = DispatcherConfig {
        sinks: sink_configs,
    };
    DispatcherBuilder::new(config, input_rx).build().await
}
