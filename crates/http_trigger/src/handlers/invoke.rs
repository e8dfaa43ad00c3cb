//! Function route handler

use std::time::Instant;

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Extension,
};
use contracts::{HttpReply, InvocationRequest};
use tracing::{debug, instrument};

use crate::{AppState, RequestId};

/// Run one invocation and return its reply
///
/// Sink payloads are queued, never awaited.
#[instrument(name = "http_invoke", skip_all)]
pub async fn invoke_function(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request = to_invocation_request(&request_id, &method, &uri, &headers);

    let (outputs, reply) = state.aggregator().handle(&request).into_parts();

    if !outputs.is_empty() {
        let queued = state.enqueue(outputs);
        debug!(queued, "Sink payloads handed to dispatcher");
    }

    state.record(reply.status(), started.elapsed());
    into_response(reply)
}

fn to_invocation_request(
    request_id: &RequestId,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
) -> InvocationRequest {
    InvocationRequest {
        invocation_id: request_id.0.clone(),
        method: method.as_str().to_string(),
        uri: uri.to_string(),
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect(),
    }
}

fn into_response(reply: HttpReply) -> Response {
    let status = StatusCode::from_u16(reply.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = reply.content_type();
    (
        status,
        [(header::CONTENT_TYPE, content_type)],
        reply.into_body(),
    )
        .into_response()
}
