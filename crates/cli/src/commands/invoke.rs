//! `invoke` command implementation.

use std::time::Instant;

use anyhow::{Context, Result};
use contracts::InvocationRequest;
use observability::InvocationMetricsAggregator;
use tracing::{info, warn};

use crate::cli::InvokeArgs;
use crate::host::{build_aggregator, load_blueprint, start_outputs, HostStats};

/// Execute the `invoke` command
///
/// Runs the same aggregator and dispatcher as `serve`, without a listener.
pub async fn run_invoke(args: &InvokeArgs) -> Result<()> {
    let blueprint = load_blueprint(&args.config)?;
    let route = blueprint.function.route();

    info!(
        function = %blueprint.function.name,
        count = args.count,
        "Running local invocations"
    );

    let started = Instant::now();
    let aggregator = build_aggregator(&blueprint.function);
    let outputs = start_outputs(&blueprint).await?;
    let mut invocations = InvocationMetricsAggregator::new();

    for i in 1..=args.count {
        let request = InvocationRequest::get(format!("local-{i}"), route.as_str());
        let call_started = Instant::now();

        let (payloads, reply) = aggregator.handle(&request).into_parts();
        let elapsed = call_started.elapsed();
        observability::record_invocation(reply.status(), elapsed);
        invocations.update(reply.status(), elapsed);

        if !payloads.is_empty() && outputs.tx.send(payloads).await.is_err() {
            warn!(invocation = i, "Dispatcher stopped, sink payloads dropped");
        }

        if !args.summary_only {
            let body = std::str::from_utf8(reply.body()).context("Reply body is not UTF-8")?;
            println!("{} {}", reply.status(), body);
        }
    }

    let dispatch = outputs.finish().await?;

    HostStats {
        invocations: invocations.summary(),
        outputs: dispatch,
        duration: started.elapsed(),
    }
    .print_summary();

    Ok(())
}
