//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router that hands every request to the Engine
//! - Wire up tower-http layers (tracing, timeout, request ID)
//! - Translate wire requests into core Requests (decoded path, bounded body)
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request as HttpRequest, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::context::{BufferedResponse, Request};
use crate::engine::Engine;
use crate::http::request_id::UuidRequestId;
use crate::lifecycle::shutdown::wait_for_shutdown;

/// State injected into the fallback handler.
#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
    max_body_size: usize,
}

/// HTTP front end for an [`Engine`].
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    engine: Arc<Engine>,
}

impl HttpServer {
    /// Freeze the engine and build the HTTP stack around it.
    pub fn new(engine: Engine, config: ServerConfig) -> Self {
        let engine = Arc::new(engine);
        for (method, pattern) in engine.routes() {
            tracing::info!(method = %method, pattern = %pattern, "Route mounted");
        }

        let state = AppState {
            engine: engine.clone(),
            max_body_size: config.limits.max_body_size,
        };
        let router = Self::build_router(&config, state);

        Self {
            router,
            config,
            engine,
        }
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.engine.routes().len(),
            groups = self.engine.group_count(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The axum router, for embedding or for driving with `tower::ServiceExt`.
    pub fn into_router(self) -> Router {
        self.router
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Catch-all handler: every request is dispatched by the Engine.
async fn dispatch_handler(State(state): State<AppState>, request: HttpRequest) -> Response {
    let (parts, body) = request.into_parts();

    let path = match urlencoding::decode(parts.uri.path()) {
        Ok(p) => p.into_owned(),
        Err(_) => {
            tracing::warn!(path = %parts.uri.path(), "Path does not decode to UTF-8");
            return (StatusCode::BAD_REQUEST, "Invalid path encoding").into_response();
        }
    };

    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Request body rejected");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let mut request = Request::new(parts.method, path)
        .with_headers(parts.headers)
        .with_body(body);
    if let Some(query) = parts.uri.query() {
        request = request.with_query(query);
    }

    // Handlers are synchronous; keep them off the async workers.
    let engine = state.engine.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let mut sink = BufferedResponse::new();
        engine.handle(request, &mut sink);
        sink
    })
    .await;

    match outcome {
        Ok(sink) => sink.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Dispatch task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
