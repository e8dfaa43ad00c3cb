//! `serve` command implementation.

use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use anyhow::Result;
use http_trigger::{AppState, RouterConfig};
use tracing::info;

use crate::cli::ServeArgs;
use crate::error::CliError;
use crate::host::{build_aggregator, load_blueprint, start_outputs, HostStats};

/// Execute the `serve` command
pub async fn run_serve(args: &ServeArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    let mut blueprint = load_blueprint(&args.config)?;

    if let Some(ref host) = args.host {
        info!(host = %host, "Overriding bind address from CLI");
        blueprint.server.host = host.clone();
    }
    if let Some(port) = args.port {
        info!(port = %port, "Overriding bind port from CLI");
        blueprint.server.port = port;
    }
    if let Some(timeout) = args.request_timeout {
        info!(timeout_secs = timeout, "Overriding request timeout from CLI");
        blueprint.server.request_timeout_secs = timeout;
    }

    // Overrides go through the same checks as the file
    config_loader::ConfigLoader::validate(&blueprint)?;

    let route = blueprint.function.route();
    info!(
        function = %blueprint.function.name,
        route = %route,
        host = %blueprint.server.host,
        port = blueprint.server.port,
        outputs = blueprint.outputs.len(),
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        println!(
            "Would serve GET {} on {}:{}",
            route, blueprint.server.host, blueprint.server.port
        );
        return Ok(());
    }

    let addr = bind_address(&blueprint.server.host, blueprint.server.port)?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let started = Instant::now();
    let outputs = start_outputs(&blueprint).await?;
    let state = AppState::new(build_aggregator(&blueprint.function), outputs.tx.clone());
    let router_config = RouterConfig::new(
        route,
        Duration::from_secs(blueprint.server.request_timeout_secs),
    );

    let served = http_trigger::start_server(
        state.clone(),
        &router_config,
        addr,
        http_trigger::shutdown_signal(),
    )
    .await;

    // Handlers are gone once the server returns; drop the last sender clone
    let invocations = state.summary();
    drop(state);
    let dispatch = outputs.finish().await?;

    served.map_err(|e| CliError::serve(e.to_string()))?;

    let stats = HostStats {
        invocations,
        outputs: dispatch,
        duration: started.elapsed(),
    };
    stats.print_summary();

    info!("Binding host finished");
    Ok(())
}

fn bind_address(host: &str, port: u16) -> Result<SocketAddr, CliError> {
    let ip: IpAddr = host
        .parse()
        .map_err(|e: std::net::AddrParseError| CliError::bind_address(host, port, e.to_string()))?;
    Ok(SocketAddr::new(ip, port))
}
