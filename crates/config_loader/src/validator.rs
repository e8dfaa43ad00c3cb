//! Config validation
//!
//! Rules:
//! - field constraints declared on the blueprint types (non-empty names, ranges)
//! - route starts with '/', is a plain path and is not reserved
//! - partition key is not blank, and is a single path segment when a
//!   file-backed document output stores records under it
//! - output names are unique
//! - file-backed document outputs name a database, a container and a
//!   partition key path starting with '/'
//! - file-backed blob outputs carry a well-formed path template

use std::collections::HashSet;

use contracts::{
    BlobPathTemplate, ContractError, FunctionBlueprint, OutputKind, SinkConfig, SinkType,
};
use validator::Validate;

/// Paths served by the host itself
const RESERVED_ROUTES: &[&str] = &["/health"];

/// Validate a FunctionBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &FunctionBlueprint) -> Result<(), ContractError> {
    validate_fields(blueprint)?;
    validate_route(blueprint)?;
    validate_partition_key(blueprint)?;
    validate_output_names(blueprint)?;
    for (idx, output) in blueprint.outputs.iter().enumerate() {
        validate_output_params(idx, output)?;
    }
    Ok(())
}

fn validate_fields(blueprint: &FunctionBlueprint) -> Result<(), ContractError> {
    blueprint
        .validate()
        .map_err(|e| ContractError::config_validation("blueprint", e.to_string()))
}

fn validate_route(blueprint: &FunctionBlueprint) -> Result<(), ContractError> {
    let route = blueprint.function.route();

    if !route.starts_with('/') {
        return Err(ContractError::config_validation(
            "function.route",
            format!("route must start with '/', got '{route}'"),
        ));
    }
    if let Some(c) = route
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || "/-_.~".contains(*c)))
    {
        return Err(ContractError::config_validation(
            "function.route",
            format!("route '{route}' contains unsupported character '{c}'"),
        ));
    }
    if RESERVED_ROUTES.contains(&route.as_str()) {
        return Err(ContractError::config_validation(
            "function.route",
            format!("route '{route}' is reserved by the host"),
        ));
    }
    Ok(())
}

fn validate_partition_key(blueprint: &FunctionBlueprint) -> Result<(), ContractError> {
    let key = blueprint.function.partition_key.as_str();

    if key.trim().is_empty() {
        return Err(ContractError::config_validation(
            "function.partition_key",
            "partition key cannot be blank",
        ));
    }

    let stored_on_disk = blueprint
        .outputs
        .iter()
        .any(|o| o.sink_type == SinkType::File && o.binding == OutputKind::Document);
    let segment_safe = key != "." && key != ".." && !key.contains(['/', '\\', '\0']);

    if stored_on_disk && !segment_safe {
        return Err(ContractError::config_validation(
            "function.partition_key",
            format!(
                "partition key '{key}' must be a single path segment for document file outputs"
            ),
        ));
    }
    Ok(())
}

fn validate_output_names(blueprint: &FunctionBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for output in &blueprint.outputs {
        if !seen.insert(output.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("outputs[name={}]", output.name),
                "duplicate output name",
            ));
        }
    }
    Ok(())
}

fn validate_output_params(idx: usize, output: &SinkConfig) -> Result<(), ContractError> {
    if output.sink_type != SinkType::File {
        return Ok(());
    }

    match output.binding {
        OutputKind::Document => {
            for key in ["database_name", "container_name"] {
                let present = output
                    .params
                    .get(key)
                    .is_some_and(|v| !v.trim().is_empty());
                if !present {
                    return Err(ContractError::config_validation(
                        format!("outputs[{idx}].params.{key}"),
                        format!("'{key}' is required for document file outputs"),
                    ));
                }
            }
            if let Some(path) = output.params.get("partition_key_path") {
                if !path.starts_with('/') {
                    return Err(ContractError::config_validation(
                        format!("outputs[{idx}].params.partition_key_path"),
                        format!("partition key path must start with '/', got '{path}'"),
                    ));
                }
            }
        }
        OutputKind::Blob => {
            if let Some(raw) = output.params.get("path") {
                BlobPathTemplate::parse(raw).map_err(|e| {
                    ContractError::config_validation(
                        format!("outputs[{idx}].params.path"),
                        e.to_string(),
                    )
                })?;
            }
        }
    }
    Ok(())
}
