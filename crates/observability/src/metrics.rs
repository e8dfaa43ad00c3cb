//! Invocation and output-delivery metrics
//!
//! Recorder functions feed the `metrics` facade (exported by Prometheus when
//! installed, no-ops otherwise); `InvocationMetricsAggregator` keeps an in-memory
//! copy for run summaries.

use std::collections::BTreeMap;
use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Record one finished invocation
///
/// Call once per `handle`, after the reply is known.
pub fn record_invocation(status: u16, elapsed: Duration) {
    let outcome = if status < 400 { "success" } else { "failure" };

    counter!(
        "binding_host_invocations_total",
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    histogram!("binding_host_invocation_latency_ms").record(elapsed.as_secs_f64() * 1000.0);
}

/// Record a payload handed (or not) to a sink queue
pub fn record_output_dispatched(sink_name: &str, queued: bool) {
    let status = if queued { "queued" } else { "dropped" };
    counter!(
        "binding_host_outputs_dispatched_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record the result of a sink write
pub fn record_output_written(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "binding_host_outputs_written_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record a sink's queue depth
pub fn record_queue_depth(sink_name: &str, depth: usize) {
    gauge!(
        "binding_host_sink_queue_depth",
        "sink" => sink_name.to_string()
    )
    .set(depth as f64);
}

/// In-memory invocation aggregator
#[derive(Debug, Clone, Default)]
pub struct InvocationMetricsAggregator {
    /// Invocations answered with a 2xx/3xx reply
    pub succeeded: u64,

    /// Invocations answered with an error reply
    pub failed: u64,

    /// Replies per status code
    pub status_counts: BTreeMap<u16, u64>,

    /// Latency statistics (ms)
    pub latency_stats: RunningStats,
}

impl InvocationMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one invocation into the aggregate
    pub fn update(&mut self, status: u16, elapsed: Duration) {
        if status < 400 {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        *self.status_counts.entry(status).or_insert(0) += 1;
        self.latency_stats.push(elapsed.as_secs_f64() * 1000.0);
    }

    /// Total invocations seen
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Build a summary report
    pub fn summary(&self) -> InvocationSummary {
        let total = self.total();
        InvocationSummary {
            total,
            succeeded: self.succeeded,
            failed: self.failed,
            failure_rate: if total > 0 {
                self.failed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            latency_ms: StatsSummary::from(&self.latency_stats),
            status_counts: self.status_counts.clone(),
        }
    }
}

/// Invocation summary
#[derive(Debug, Clone, Default)]
pub struct InvocationSummary {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub failure_rate: f64,
    pub latency_ms: StatsSummary,
    pub status_counts: BTreeMap<u16, u64>,
}

impl std::fmt::Display for InvocationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Invocation Summary ===")?;
        writeln!(f, "Total invocations: {}", self.total)?;
        writeln!(f, "Succeeded: {}", self.succeeded)?;
        writeln!(f, "Failed: {} ({:.2}%)", self.failed, self.failure_rate)?;
        writeln!(f, "Latency (ms): {}", self.latency_ms)?;

        if !self.status_counts.is_empty() {
            writeln!(f, "Replies by status:")?;
            for (status, count) in &self.status_counts {
                writeln!(f, "  {}: {}", status, count)?;
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
