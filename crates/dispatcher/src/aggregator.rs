//! ResultAggregator - one invocation in, one AggregateResult out

use std::sync::Arc;

use contracts::{
    AggregateResult, Clock, HttpReply, InvocationRequest, Record, WelcomeResponse,
    WELCOME_MESSAGE,
};
use synthesizer::RecordSynthesizer;
use tracing::{error, info, instrument};

use crate::error::InvocationError;

/// Builds the per-invocation aggregate
///
/// Every error raised while synthesizing the record or encoding the reply and sink
/// payloads is caught here and turned into the fixed 500 reply with no sink
/// payloads. The aggregator never sees whether the sink writes succeed.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    synthesizer: RecordSynthesizer,
    clock: Arc<dyn Clock>,
}

impl ResultAggregator {
    /// Create an aggregator from its collaborators
    pub fn new(synthesizer: RecordSynthesizer, clock: Arc<dyn Clock>) -> Self {
        Self { synthesizer, clock }
    }

    /// Handle one invocation
    #[instrument(
        name = "handle_invocation",
        skip(self, request),
        fields(
            invocation_id = %request.invocation_id,
            method = %request.method,
            user_agent = request.header("user-agent").unwrap_or("-"),
        )
    )]
    pub fn handle(&self, request: &InvocationRequest) -> AggregateResult {
        match self.try_handle() {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, detail = ?e, "Error processing request");
                AggregateResult::failure(HttpReply::internal_error())
            }
        }
    }

    fn try_handle(&self) -> Result<AggregateResult, InvocationError> {
        let now = self.clock.now_utc();
        info!(time = %now, "Processing request");

        let record = self
            .synthesizer
            .synthesize(now)
            .map_err(InvocationError::Synthesis)?;

        let reply = welcome_reply(&record)?;
        let blob = serde_json::to_string_pretty(&record)
            .map_err(|e| InvocationError::serialization("blob payload", e))?;

        info!(id = %record.id(), "Data will be written to the document sink");

        Ok(AggregateResult::success(record, blob, reply))
    }
}

fn welcome_reply(record: &Record) -> Result<HttpReply, InvocationError> {
    let body = WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
        id: record.id().to_string(),
        timestamp: record.timestamp(),
        function_message: record.message().to_string(),
    };

    let encoded = serde_json::to_vec(&body)
        .map_err(|e| InvocationError::serialization("welcome reply", e))?;
    Ok(HttpReply::json(200, encoded))
}
