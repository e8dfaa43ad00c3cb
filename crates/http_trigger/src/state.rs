//! Shared handler state

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use contracts::SinkOutputs;
use dispatcher::ResultAggregator;
use observability::{InvocationMetricsAggregator, InvocationSummary};
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Invocation id assigned by the request-id middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// State shared by every request
#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<ResultAggregator>,
    outputs: mpsc::Sender<SinkOutputs>,
    stats: Arc<Mutex<InvocationMetricsAggregator>>,
    started_at: Instant,
}

impl AppState {
    /// Create state around an aggregator and the dispatcher's input queue
    pub fn new(aggregator: ResultAggregator, outputs: mpsc::Sender<SinkOutputs>) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            outputs,
            stats: Arc::new(Mutex::new(InvocationMetricsAggregator::new())),
            started_at: Instant::now(),
        }
    }

    pub fn aggregator(&self) -> &ResultAggregator {
        &self.aggregator
    }

    /// Time since the state was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Invocation counters collected so far
    pub fn summary(&self) -> InvocationSummary {
        match self.stats.lock() {
            Ok(stats) => stats.summary(),
            Err(poisoned) => poisoned.into_inner().summary(),
        }
    }

    /// Queue sink payloads without waiting for the dispatcher
    ///
    /// Returns false when the payloads were dropped.
    pub(crate) fn enqueue(&self, outputs: SinkOutputs) -> bool {
        match self.outputs.try_send(outputs) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Output queue full, sink payloads dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!("Dispatcher is gone, sink payloads dropped");
                false
            }
        }
    }

    pub(crate) fn record(&self, status: u16, elapsed: Duration) {
        observability::record_invocation(status, elapsed);
        match self.stats.lock() {
            Ok(mut stats) => stats.update(status, elapsed),
            Err(poisoned) => poisoned.into_inner().update(status, elapsed),
        }
    }
}
