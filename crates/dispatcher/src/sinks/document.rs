//! DocumentStoreSink - file-backed document container
//!
//! Layout: `<base_path>/<database>/<container>/<partition>/<id>.json`. Writes are
//! upserts keyed by record id within the partition.

use contracts::{ContractError, OutputKind, OutputSink, Record, SinkOutput};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, instrument};

/// Configuration for DocumentStoreSink
#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    /// Root directory of the store
    pub base_path: PathBuf,
    /// Database name (e.g., "ToDoList")
    pub database_name: String,
    /// Container name (e.g., "Items")
    pub container_name: String,
    /// JSON pointer to the partition key inside the document
    pub partition_key_path: String,
}

impl DocumentStoreConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output/documents"));

        let database_name = params
            .get("database_name")
            .cloned()
            .ok_or_else(|| "missing 'database_name' parameter".to_string())?;

        let container_name = params
            .get("container_name")
            .cloned()
            .ok_or_else(|| "missing 'container_name' parameter".to_string())?;

        let partition_key_path = params
            .get("partition_key_path")
            .cloned()
            .unwrap_or_else(|| "/partitionKey".to_string());

        if !partition_key_path.starts_with('/') {
            return Err(format!(
                "partition_key_path '{}' must start with '/'",
                partition_key_path
            ));
        }

        Ok(Self {
            base_path,
            database_name,
            container_name,
            partition_key_path,
        })
    }

    /// Directory holding the container's partitions
    pub fn container_dir(&self) -> PathBuf {
        self.base_path
            .join(&self.database_name)
            .join(&self.container_name)
    }
}

/// Sink that upserts records into a document container on disk
pub struct DocumentStoreSink {
    name: String,
    config: DocumentStoreConfig,
    created_dirs: HashSet<PathBuf>,
}

impl DocumentStoreSink {
    /// Create a new DocumentStoreSink
    pub fn new(name: impl Into<String>, config: DocumentStoreConfig) -> std::io::Result<Self> {
        fs::create_dir_all(config.container_dir())?;

        Ok(Self {
            name: name.into(),
            config,
            created_dirs: HashSet::new(),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let config = DocumentStoreConfig::from_params(params)
            .map_err(|e| ContractError::sink_write(&name, e))?;

        Self::new(name.as_str(), config).map_err(|e| ContractError::SinkConnection {
            sink_name: name.clone(),
            message: e.to_string(),
        })
    }

    /// Path a record is stored at
    pub fn document_path(&self, record: &Record) -> Result<PathBuf, ContractError> {
        let document = serde_json::to_value(record)
            .map_err(|e| ContractError::serialization("document", e.to_string()))?;
        let partition = self.resolve_partition(&document)?;

        Ok(self
            .config
            .container_dir()
            .join(path_segment(&self.name, "partition key", &partition)?)
            .join(format!(
                "{}.json",
                path_segment(&self.name, "id", record.id())?
            )))
    }

    fn resolve_partition(&self, document: &serde_json::Value) -> Result<String, ContractError> {
        let value = document
            .pointer(&self.config.partition_key_path)
            .ok_or_else(|| {
                ContractError::sink_write(
                    &self.name,
                    format!(
                        "document has no value at partition key path '{}'",
                        self.config.partition_key_path
                    ),
                )
            })?;

        match value {
            serde_json::Value::String(s) => Ok(s.clone()),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::Bool(b) => Ok(b.to_string()),
            other => Err(ContractError::sink_write(
                &self.name,
                format!("unsupported partition key value: {other}"),
            )),
        }
    }

    fn upsert(&mut self, record: &Record) -> Result<PathBuf, ContractError> {
        let path = self.document_path(record)?;

        if let Some(dir) = path.parent() {
            if !self.created_dirs.contains(dir) {
                fs::create_dir_all(dir)?;
                self.created_dirs.insert(dir.to_path_buf());
            }
        }

        let encoded = serde_json::to_vec(record)
            .map_err(|e| ContractError::serialization("document", e.to_string()))?;

        // Replace atomically so readers never see a half-written document
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &path)?;

        Ok(path)
    }
}

/// Reject values that would escape the container directory
fn path_segment<'a>(sink: &str, field: &str, value: &'a str) -> Result<&'a str, ContractError> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);

    if invalid {
        return Err(ContractError::sink_write(
            sink,
            format!("{field} '{value}' is not a valid path segment"),
        ));
    }
    Ok(value)
}

impl OutputSink for DocumentStoreSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Document
    }

    #[instrument(
        name = "document_sink_write",
        skip(self, output),
        fields(sink = %self.name)
    )]
    async fn write(&mut self, output: &SinkOutput) -> Result<(), ContractError> {
        let SinkOutput::Document(record) = output else {
            return Err(ContractError::unsupported_output(
                &self.name,
                OutputKind::Document,
                output.kind(),
            ));
        };

        match self.upsert(record) {
            Ok(path) => {
                debug!(sink = %self.name, id = %record.id(), path = %path.display(), "Document upserted");
                Ok(())
            }
            Err(e) => {
                error!(sink = %self.name, id = %record.id(), error = %e, "Upsert failed");
                Err(e)
            }
        }
    }

    #[instrument(name = "document_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        // Every upsert is already on disk
        Ok(())
    }

    #[instrument(name = "document_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, "DocumentStoreSink closed");
        Ok(())
    }
}
