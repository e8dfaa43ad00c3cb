//! LogSink - logs output summary via tracing

use contracts::{ContractError, OutputKind, OutputSink, SinkOutput};
use tracing::{info, instrument};

/// Sink that logs payload summaries for debugging
pub struct LogSink {
    name: String,
    kind: OutputKind,
}

impl LogSink {
    /// Create a new LogSink bound to `kind`
    pub fn new(name: impl Into<String>, kind: OutputKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    fn log_output_summary(&self, output: &SinkOutput) {
        match output {
            SinkOutput::Document(record) => info!(
                sink = %self.name,
                id = %record.id(),
                partition_key = %record.partition_key(),
                timestamp = %record.timestamp(),
                "Document received"
            ),
            SinkOutput::Blob(content) => info!(
                sink = %self.name,
                bytes = content.len(),
                lines = content.lines().count(),
                "Blob received"
            ),
        }
    }
}

impl OutputSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> OutputKind {
        self.kind
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, output),
        fields(sink = %self.name, kind = %self.kind)
    )]
    async fn write(&mut self, output: &SinkOutput) -> Result<(), ContractError> {
        if output.kind() != self.kind {
            return Err(ContractError::unsupported_output(
                &self.name,
                self.kind,
                output.kind(),
            ));
        }
        self.log_output_summary(output);
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use contracts::Record;

    #[tokio::test]
    async fn test_log_sink_write() {
        let mut sink = LogSink::new("test_log", OutputKind::Document);
        let record = Record::new("abc", "1", Utc::now(), "hello").unwrap();

        let result = sink.write(&SinkOutput::Document(record)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_log_sink_kind_mismatch() {
        let mut sink = LogSink::new("blob_log", OutputKind::Blob);
        let record = Record::new("abc", "1", Utc::now(), "hello").unwrap();

        assert!(sink.write(&SinkOutput::Document(record)).await.is_err());
        assert!(sink.write(&SinkOutput::Blob("{}".into())).await.is_ok());
    }
}
