//! HTTP transport.
//!
//! # Responsibilities
//! - Accept connections and frame HTTP via Axum
//! - Buffer each request body completely before anything else runs
//! - Hand method + raw target + body to [`router::dispatch`]
//! - Serialize the [`Reply`] with a JSON content type
//!
//! Handlers do blocking file I/O, so dispatch runs on the blocking pool.

use crate::config::ServiceConfig;
use crate::handlers::{Items, Reply};
use crate::router::{self, Request};
use crate::store::RecordStore;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared state injected into the request handler.
pub struct AppState<S> {
    items: Arc<Items<S>>,
}

// Manual impl: deriving would demand `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

/// HTTP server for the collection.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Wire `items` behind an Axum router configured from `config`.
    pub fn new<S: RecordStore + 'static>(config: ServiceConfig, items: Items<S>) -> Self {
        let state = AppState {
            items: Arc::new(items),
        };
        let router = Self::build_router(state, config.limits.max_body_bytes);
        Self { router, config }
    }

    /// Every path goes through one handler; route lookup is ours, not Axum's.
    fn build_router<S: RecordStore + 'static>(state: AppState<S>, max_body_bytes: usize) -> Router {
        Router::new()
            .fallback(handle_request::<S>)
            .with_state(state)
            .layer(DefaultBodyLimit::max(max_body_bytes))
            .layer(TraceLayer::new_for_http())
    }

    /// The Axum router, for driving requests in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener until
    /// Ctrl-C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn handle_request<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| uri.path().to_owned());

    let body = match body {
        Ok(bytes) => bytes,
        Err(rejection) => return body_failure(&method, &target, &rejection).into_response(),
    };

    let request = Request::new(method, target, body);
    let items = Arc::clone(&state.items);
    match tokio::task::spawn_blocking(move || router::dispatch(&*items, &request)).await {
        Ok(reply) => reply.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "handler task failed");
            Reply::message(StatusCode::INTERNAL_SERVER_ERROR, "message", "Internal Server Error")
                .into_response()
        }
    }
}

/// 413 only when the body outgrew `max_body_bytes`. Any other buffering
/// failure (client gone mid-stream, broken chunking) is the client's fault
/// too, but not a size problem.
fn body_failure(method: &Method, target: &str, rejection: &BytesRejection) -> Reply {
    tracing::warn!(method = %method, target = %target, error = %rejection, "request body rejected");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Reply::message(StatusCode::PAYLOAD_TOO_LARGE, "message", "Payload Too Large")
    } else {
        Reply::message(StatusCode::BAD_REQUEST, "message", "Bad Request")
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
