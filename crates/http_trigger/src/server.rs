//! Router and server setup
//!
//! Requests flow through middleware in order:
//! 1. Request ID assignment (`X-Request-Id`)
//! 2. Request/response tracing
//! 3. Timeout enforcement
//! 4. Handler execution

use std::{future::Future, net::SocketAddr, time::Duration};

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{handlers, AppState, RequestId};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Router settings taken from the server config
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Function route, e.g. `/api/ExampleHttpWithBindingTrigger`
    pub route: String,
    /// Host-side request timeout
    pub request_timeout: Duration,
}

impl RouterConfig {
    pub fn new(route: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            route: route.into(),
            request_timeout,
        }
    }
}

/// Creates the router: GET on the function route plus `/health`
///
/// Other methods on the function route are answered with 405 by the router.
pub fn create_router(state: AppState, config: &RouterConfig) -> Router {
    Router::new()
        .route(&config.route, get(handlers::invoke_function))
        .route("/health", get(handlers::health_check))
        .layer(timeout_layer(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(inject_request_id))
        .with_state(state)
}

/// Requests still running after `timeout` are answered with 408
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Assigns the invocation id and echoes it as `X-Request-Id`
///
/// A caller-supplied id is kept; otherwise a fresh UUID is used.
async fn inject_request_id(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Serve on an already-bound listener until `shutdown` resolves
pub async fn serve(
    listener: tokio::net::TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    info!(%addr, "HTTP host listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP host stopped gracefully");
    Ok(())
}

/// Bind `addr` and serve until `shutdown` resolves
///
/// # Errors
///
/// Returns `std::io::Error` if the address cannot be bound.
pub async fn start_server(
    state: AppState,
    config: &RouterConfig,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let router = create_router(state, config);

    info!(%addr, route = %config.route, "Starting HTTP host");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    serve(listener, router, shutdown).await
}

/// Waits for CTRL+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    warn!("Waiting for in-flight requests to complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::Method,
    };
    use chrono::{TimeZone, Utc};
    use contracts::{SinkOutputs, WELCOME_MESSAGE};
    use dispatcher::ResultAggregator;
    use serde_json::Value;
    use std::sync::Arc;
    use synthesizer::{ManualClock, RecordSynthesizer, SequentialIdGenerator};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    const ROUTE: &str = "/api/ExampleHttpWithBindingTrigger";

    fn test_app(capacity: usize) -> (Router, AppState, mpsc::Receiver<SinkOutputs>) {
        let clock = ManualClock::starting_at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let synthesizer = RecordSynthesizer::new(Arc::new(SequentialIdGenerator::new("rec")));
        let aggregator = ResultAggregator::new(synthesizer, Arc::new(clock));

        let (tx, rx) = mpsc::channel(capacity);
        let state = AppState::new(aggregator, tx);
        let config = RouterConfig::new(ROUTE, Duration::from_secs(5));
        (create_router(state.clone(), &config), state, rx)
    }

    fn request(method: Method, uri: &str) -> Request {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn get_returns_welcome_and_queues_outputs() {
        let (app, _state, mut rx) = test_app(8);

        let response = app.oneshot(request(Method::GET, ROUTE)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );

        let body = body_json(response).await;
        assert_eq!(body["message"], WELCOME_MESSAGE);
        assert_eq!(body["id"], "rec-1");
        assert!(body["functionMessage"]
            .as_str()
            .unwrap()
            .starts_with("Function executed at "));

        let outputs = rx.try_recv().unwrap();
        assert_eq!(outputs.document.as_ref().map(|r| r.id()), Some("rec-1"));
        assert!(outputs.blob.is_some());
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        let (app, _state, _rx) = test_app(8);

        let req = axum::http::Request::builder()
            .uri(ROUTE)
            .header("X-Request-Id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn post_is_method_not_allowed() {
        let (app, state, mut rx) = test_app(8);

        let response = app.oneshot(request(Method::POST, ROUTE)).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(rx.try_recv().is_err());
        assert_eq!(state.summary().total, 0);
    }

    #[tokio::test]
    async fn full_output_queue_does_not_change_reply() {
        let (app, state, _rx) = test_app(1);

        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(request(Method::GET, ROUTE))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(state.summary().succeeded, 3);
    }

    #[tokio::test]
    async fn health_reports_invocations() {
        let (app, _state, _rx) = test_app(8);

        app.clone()
            .oneshot(request(Method::GET, ROUTE))
            .await
            .unwrap();
        let response = app.oneshot(request(Method::GET, "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["invocations"], 1);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let (app, _state, _rx) = test_app(8);
        let response = app.oneshot(request(Method::GET, "/api/other")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn slow_request_times_out_with_408() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .layer(timeout_layer(Duration::from_millis(20)));

        let response = app.oneshot(request(Method::GET, "/slow")).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
