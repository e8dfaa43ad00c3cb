//! # Dispatcher
//!
//! Result aggregation and output fan-out.
//!
//! Responsible for:
//! - Turning one invocation into an `AggregateResult` (`ResultAggregator`)
//! - Fan-out of the sink payloads to every bound sink (`Dispatcher`)
//! - Isolating slow sinks so they never block the caller-facing reply

pub mod aggregator;
pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use aggregator::ResultAggregator;
pub use contracts::{AggregateResult, OutputSink, SinkOutput, SinkOutputs};
pub use dispatcher::{
    create_dispatcher, Dispatcher, DispatcherBuilder, DispatcherConfig, DispatcherSummary,
};
pub use error::{DispatcherError, InvocationError};
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{BlobStoreSink, DocumentStoreSink, LogSink};
