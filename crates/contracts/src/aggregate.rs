//! AggregateResult - Result Aggregator output
//!
//! The per-invocation envelope: one HTTP reply plus zero or more sink payloads.

use bytes::Bytes;

use crate::Record;

/// MIME type used for every reply body
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Generic error body returned on the failure path
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error occurred";

/// Transport-agnostic HTTP reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    status: u16,
    content_type: &'static str,
    body: Bytes,
}

impl HttpReply {
    /// Build a JSON reply from an already encoded body
    pub fn json(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: JSON_CONTENT_TYPE,
            body: body.into(),
        }
    }

    /// The fixed 500 reply; never fails to build
    pub fn internal_error() -> Self {
        Self::json(
            500,
            Bytes::from_static(br#"{"error":"Internal server error occurred"}"#),
        )
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Content-Type header value
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Encoded body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume the reply, returning the body
    pub fn into_body(self) -> Bytes {
        self.body
    }
}

/// Payloads destined for the sinks, detached from the reply
///
/// Handed to the host dispatcher after the reply is built. Either both fields are
/// set (success) or neither (failure).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkOutputs {
    /// Record for the document sink
    pub document: Option<Record>,
    /// Indented serialized record for the blob sink
    pub blob: Option<String>,
}

impl SinkOutputs {
    /// True when no sink should be written
    pub fn is_empty(&self) -> bool {
        self.document.is_none() && self.blob.is_none()
    }
}

/// Per-invocation output envelope
///
/// Only two constructors exist, so the reply is always set and the sink payloads are
/// always correlated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    outputs: SinkOutputs,
    http_response: HttpReply,
}

impl AggregateResult {
    /// Success envelope: both sink payloads present
    pub fn success(record: Record, blob: String, http_response: HttpReply) -> Self {
        Self {
            outputs: SinkOutputs {
                document: Some(record),
                blob: Some(blob),
            },
            http_response,
        }
    }

    /// Failure envelope: no sink payloads
    pub fn failure(http_response: HttpReply) -> Self {
        Self {
            outputs: SinkOutputs::default(),
            http_response,
        }
    }

    /// Record destined for the document sink
    pub fn document_payload(&self) -> Option<&Record> {
        self.outputs.document.as_ref()
    }

    /// Serialized record destined for the blob sink
    pub fn blob_payload(&self) -> Option<&str> {
        self.outputs.blob.as_deref()
    }

    /// Reply for the caller
    pub fn http_response(&self) -> &HttpReply {
        &self.http_response
    }

    /// Sink payloads, borrowed
    pub fn outputs(&self) -> &SinkOutputs {
        &self.outputs
    }

    /// Split into sink payloads and reply
    pub fn into_parts(self) -> (SinkOutputs, HttpReply) {
        (self.outputs, self.http_response)
    }
}
