//! SinkHandle - manages a sink with isolated queue and worker task

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use contracts::{OutputKind, OutputSink, SinkOutput};

use crate::metrics::SinkMetrics;

/// Handle to a running sink worker
pub struct SinkHandle {
    /// Sink name
    name: String,
    /// Aggregate field the sink is bound to
    kind: OutputKind,
    /// Channel to send payloads to worker
    tx: mpsc::Sender<SinkOutput>,
    /// Shared metrics
    metrics: Arc<SinkMetrics>,
    /// Worker task handle
    worker_handle: JoinHandle<()>,
}

impl SinkHandle {
    /// Create a new SinkHandle and spawn the worker task
    pub fn spawn<S: OutputSink + Send + 'static>(sink: S, queue_capacity: usize) -> Self {
        let name = sink.name().to_string();
        let kind = sink.kind();
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let metrics = Arc::new(SinkMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_name = name.clone();

        let worker_handle = tokio::spawn(async move {
            sink_worker(sink, rx, worker_metrics, worker_name).await;
        });

        Self {
            name,
            kind,
            tx,
            metrics,
            worker_handle,
        }
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the bound output kind
    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Queue a payload for the sink (non-blocking)
    ///
    /// Returns true if queued, false if the queue is full or the worker is gone
    /// (payload dropped). Payloads of another kind are rejected without queuing.
    pub fn try_send(&self, output: SinkOutput) -> bool {
        if output.kind() != self.kind {
            warn!(
                sink = %self.name,
                expected = %self.kind,
                actual = %output.kind(),
                "Payload kind does not match sink binding, skipped"
            );
            return false;
        }

        match self.tx.try_send(output) {
            Ok(()) => {
                self.metrics.inc_enqueued();
                self.metrics
                    .set_queue_len(self.tx.max_capacity() - self.tx.capacity());
                true
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.metrics.inc_dropped();
                warn!(sink = %self.name, "Queue full, output dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.metrics.inc_dropped();
                error!(sink = %self.name, "Sink worker closed unexpectedly");
                false
            }
        }
    }

    /// Shutdown the sink worker gracefully
    ///
    /// Queued payloads are written before the sink is flushed and closed.
    #[instrument(name = "sink_handle_shutdown", skip(self), fields(sink = %self.name))]
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.worker_handle.await {
            error!(sink = %self.name, error = ?e, "Worker task panicked");
        }
        debug!(sink = %self.name, "SinkHandle shutdown complete");
    }
}

/// Worker task that consumes payloads and writes to sink
#[instrument(
    name = "sink_worker_loop",
    skip(sink, rx, metrics),
    fields(sink = %name)
)]
async fn sink_worker<S: OutputSink>(
    mut sink: S,
    mut rx: mpsc::Receiver<SinkOutput>,
    metrics: Arc<SinkMetrics>,
    name: String,
) {
    debug!(sink = %name, "Sink worker started");

    while let Some(output) = rx.recv().await {
        metrics.set_queue_len(rx.len());
        observability::record_queue_depth(&name, rx.len());

        match sink.write(&output).await {
            Ok(()) => {
                metrics.inc_written();
                observability::record_output_written(&name, true);
            }
            Err(e) => {
                metrics.inc_failed();
                observability::record_output_written(&name, false);
                error!(sink = %name, error = %e, "Write failed");
                // Single attempt per payload; keep draining the queue
            }
        }
    }

    if let Err(e) = sink.flush().await {
        error!(sink = %name, error = %e, "Flush failed on shutdown");
    }
    if let Err(e) = sink.close().await {
        error!(sink = %name, error = %e, "Close failed on shutdown");
    }

    debug!(sink = %name, "Sink worker stopped");
}
