//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{BlobPathTemplate, FunctionBlueprint, OutputKind, SinkType};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    function: String,
    route: String,
    document_outputs: usize,
    blob_outputs: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    function: blueprint.function.name.clone(),
                    route: blueprint.function.route(),
                    document_outputs: blueprint.outputs_for(OutputKind::Document).count(),
                    blob_outputs: blueprint.outputs_for(OutputKind::Blob).count(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &FunctionBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    for kind in [OutputKind::Document, OutputKind::Blob] {
        if blueprint.outputs_for(kind).next().is_none() {
            warnings.push(format!("No {kind} output configured - {kind} payloads will be discarded"));
        }
    }

    for output in &blueprint.outputs {
        if output.sink_type == SinkType::File && !output.params.contains_key("base_path") {
            warnings.push(format!(
                "Output '{}' has no base_path - using the default directory",
                output.name
            ));
        }

        let fixed_blob_name = output.binding == OutputKind::Blob
            && output.sink_type == SinkType::File
            && output
                .params
                .get("path")
                .and_then(|raw| BlobPathTemplate::parse(raw).ok())
                .is_some_and(|template| !template.is_randomized());
        if fixed_blob_name {
            warnings.push(format!(
                "Output '{}' path has no {{rand-guid}} - every invocation overwrites the same blob",
                output.name
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Function: {}", summary.function);
            println!("  Route: GET {}", summary.route);
            println!("  Document outputs: {}", summary.document_outputs);
            println!("  Blob outputs: {}", summary.blob_outputs);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
