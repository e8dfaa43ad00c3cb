//! `info` command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use contracts::FunctionBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::host::load_blueprint;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    function: FunctionInfo,
    server: ServerInfo,
    outputs: Vec<OutputInfo>,
}

#[derive(Serialize)]
struct FunctionInfo {
    name: String,
    route: String,
    partition_key: String,
}

#[derive(Serialize)]
struct ServerInfo {
    host: String,
    port: u16,
    request_timeout_secs: u64,
    output_buffer: usize,
}

#[derive(Serialize)]
struct OutputInfo {
    name: String,
    binding: String,
    sink_type: String,
    queue_capacity: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    params: BTreeMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let blueprint = load_blueprint(&args.config)?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &FunctionBlueprint, args: &InfoArgs) -> ConfigInfo {
    let outputs = blueprint
        .outputs
        .iter()
        .map(|o| OutputInfo {
            name: o.name.clone(),
            binding: o.binding.to_string(),
            sink_type: format!("{:?}", o.sink_type),
            queue_capacity: o.queue_capacity,
            params: if args.outputs {
                o.params.clone().into_iter().collect()
            } else {
                BTreeMap::new()
            },
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        function: FunctionInfo {
            name: blueprint.function.name.clone(),
            route: blueprint.function.route(),
            partition_key: blueprint.function.partition_key.clone(),
        },
        server: ServerInfo {
            host: blueprint.server.host.clone(),
            port: blueprint.server.port,
            request_timeout_secs: blueprint.server.request_timeout_secs,
            output_buffer: blueprint.server.output_buffer,
        },
        outputs,
    }
}

fn print_config_info(blueprint: &FunctionBlueprint, args: &InfoArgs) {
    println!("=== Binding Host Configuration ===\n");

    println!("Function");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Name: {}", blueprint.function.name);
    println!("   ├─ Route: GET {}", blueprint.function.route());
    println!("   └─ Partition key: {}", blueprint.function.partition_key);

    let server = &blueprint.server;
    println!("\nServer");
    println!("   ├─ Listen: {}:{}", server.host, server.port);
    println!("   ├─ Request timeout: {}s", server.request_timeout_secs);
    println!("   └─ Output buffer: {}", server.output_buffer);

    println!("\nOutputs ({})", blueprint.outputs.len());
    for (i, output) in blueprint.outputs.iter().enumerate() {
        let is_last = i == blueprint.outputs.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!(
            "   {} {} ({} -> {:?}, queue {})",
            prefix, output.name, output.binding, output.sink_type, output.queue_capacity
        );

        if args.outputs {
            let params: BTreeMap<_, _> = output.params.iter().collect();
            for (key, value) in params {
                println!("   {}   {} = {}", child_prefix, key, value);
            }
        }
    }

    println!();
}
