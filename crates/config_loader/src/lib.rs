//! # Config Loader
//!
//! Loads and checks the host configuration.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate field constraints and cross-field rules
//! - Produce a `FunctionBlueprint`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("binding-host.toml")).unwrap();
//! println!("Route: {}", blueprint.function.route());
//! ```

mod parser;
mod validator;

pub use contracts::FunctionBlueprint;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Format is taken from the file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<FunctionBlueprint, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<FunctionBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Check an already-built blueprint
    pub fn validate(blueprint: &FunctionBlueprint) -> Result<(), ContractError> {
        validator::validate(blueprint)
    }

    /// Serialize FunctionBlueprint to TOML string
    pub fn to_toml(blueprint: &FunctionBlueprint) -> Result<String, ContractError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize FunctionBlueprint to JSON string
    pub fn to_json(blueprint: &FunctionBlueprint) -> Result<String, ContractError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::OutputKind;

    const MINIMAL_TOML: &str = r#"
[function]
name = "ExampleHttpWithBindingTrigger"

[[outputs]]
name = "cosmos"
binding = "document"
sink_type = "log"

[[outputs]]
name = "blob"
binding = "blob"
sink_type = "log"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.function.route(), "/api/ExampleHttpWithBindingTrigger");
        assert_eq!(bp.function.partition_key, "1");
        assert_eq!(bp.outputs_for(OutputKind::Document).count(), 1);
    }

    #[test]
    fn test_load_from_path_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.toml");
        std::fs::write(&path, MINIMAL_TOML).unwrap();

        let bp = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(bp.outputs.len(), 2);

        let bad = dir.path().join("host.yaml");
        std::fs::write(&bad, MINIMAL_TOML).unwrap();
        let err = ConfigLoader::load_from_path(&bad).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_toml_json_agree() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(bp.function.name, bp2.function.name);
        assert_eq!(bp.outputs.len(), bp2.outputs.len());

        let toml = ConfigLoader::to_toml(&bp2).unwrap();
        let bp3 = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        assert_eq!(bp3.server.port, bp.server.port);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[function]
name = "fn"

[[outputs]]
name = "dup"
binding = "document"
sink_type = "log"

[[outputs]]
name = "dup"
binding = "blob"
sink_type = "log"
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }
}
