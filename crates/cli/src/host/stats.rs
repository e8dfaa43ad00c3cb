//! Host run statistics.

use std::time::Duration;

use dispatcher::DispatcherSummary;
use observability::InvocationSummary;

/// Statistics from a host run
#[derive(Debug, Clone, Default)]
pub struct HostStats {
    /// Invocation counters and latency
    pub invocations: InvocationSummary,

    /// Output delivery counters
    pub outputs: DispatcherSummary,

    /// Wall time of the run
    pub duration: Duration,
}

impl HostStats {
    /// Invocations per second over the run
    pub fn rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.invocations.total as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Host Statistics ===\n");
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
        println!("Rate: {:.2} invocations/s\n", self.rate());
        print!("{}", self.invocations);

        println!("\n=== Output Delivery ===");
        println!(
            "Payload sets: {} received, {} skipped (failed invocations)",
            self.outputs.received, self.outputs.skipped
        );
        for (name, snap) in &self.outputs.sinks {
            println!(
                "  {}: written={}, failed={}, dropped={}",
                name, snap.written, snap.failed, snap.dropped
            );
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_handles_zero_duration() {
        let stats = HostStats::default();
        assert_eq!(stats.rate(), 0.0);

        let stats = HostStats {
            invocations: InvocationSummary {
                total: 10,
                ..Default::default()
            },
            duration: Duration::from_secs(2),
            ..Default::default()
        };
        assert!((stats.rate() - 5.0).abs() < 1e-9);
    }
}
