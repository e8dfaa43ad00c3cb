//! # HTTP Trigger
//!
//! axum host for the binding function.
//!
//! Each GET on the function route becomes one `InvocationRequest`; the
//! `ResultAggregator` answers it, the sink payloads are queued for the dispatcher and
//! the HTTP reply is returned as-is. Sink writes happen after the reply and never
//! change it.

mod handlers;
mod server;
mod state;

pub use server::{create_router, serve, shutdown_signal, start_server, RouterConfig};
pub use state::{AppState, RequestId};
