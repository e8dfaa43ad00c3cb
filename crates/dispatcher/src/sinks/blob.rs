//! BlobStoreSink - file-backed blob container
//!
//! Each write creates a new blob named by rendering the path template; the core
//! never chooses blob names.

use contracts::{BlobPathTemplate, ContractError, OutputKind, OutputSink, SinkOutput};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// Configuration for BlobStoreSink
#[derive(Debug, Clone)]
pub struct BlobStoreConfig {
    /// Root directory of the container
    pub base_path: PathBuf,
    /// Blob name template, relative to `base_path`
    pub path: BlobPathTemplate,
}

impl BlobStoreConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output/blobs"));

        let path = match params.get("path") {
            Some(raw) => BlobPathTemplate::parse(raw).map_err(|e| e.to_string())?,
            None => BlobPathTemplate::default(),
        };

        Ok(Self { base_path, path })
    }
}

/// Sink that stores blob payloads as files
pub struct BlobStoreSink {
    name: String,
    config: BlobStoreConfig,
    blobs_written: u64,
}

impl BlobStoreSink {
    /// Create a new BlobStoreSink
    pub fn new(name: impl Into<String>, config: BlobStoreConfig) -> std::io::Result<Self> {
        fs::create_dir_all(&config.base_path)?;

        Ok(Self {
            name: name.into(),
            config,
            blobs_written: 0,
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let config = BlobStoreConfig::from_params(params)
            .map_err(|e| ContractError::sink_write(&name, e))?;

        Self::new(name.as_str(), config).map_err(|e| ContractError::SinkConnection {
            sink_name: name.clone(),
            message: e.to_string(),
        })
    }

    /// Number of blobs written since creation
    pub fn blobs_written(&self) -> u64 {
        self.blobs_written
    }

    fn next_blob_path(&self) -> (String, PathBuf) {
        let blob_name = self.config.path.render(|| Uuid::new_v4().to_string());
        let path = self.config.base_path.join(&blob_name);
        (blob_name, path)
    }

    fn store(&mut self, content: &str) -> Result<String, ContractError> {
        let (blob_name, path) = self.next_blob_path();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, content)?;

        self.blobs_written += 1;
        Ok(blob_name)
    }
}

impl OutputSink for BlobStoreSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Blob
    }

    #[instrument(
        name = "blob_sink_write",
        skip(self, output),
        fields(sink = %self.name)
    )]
    async fn write(&mut self, output: &SinkOutput) -> Result<(), ContractError> {
        let SinkOutput::Blob(content) = output else {
            return Err(ContractError::unsupported_output(
                &self.name,
                OutputKind::Blob,
                output.kind(),
            ));
        };

        match self.store(content) {
            Ok(blob_name) => {
                debug!(sink = %self.name, blob = %blob_name, bytes = content.len(), "Blob stored");
                Ok(())
            }
            Err(e) => {
                error!(sink = %self.name, error = %e, "Blob write failed");
                Err(ContractError::sink_write(&self.name, e.to_string()))
            }
        }
    }

    #[instrument(name = "blob_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    #[instrument(name = "blob_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, blobs = self.blobs_written, "BlobStoreSink closed");
        Ok(())
    }
}
