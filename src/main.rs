//! trie-dispatch demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ http::server (axum, request id, trace, timeout)
//!                         │
//!                         ▼
//!                    engine::Engine::handle
//!                         │  groups whose prefix matches → middleware
//!                         │  routing::Router::resolve    → route handler / 404
//!                         ▼
//!                    context::Context chain: m1 → m2 → handler
//!                         │  (each next() returns after the tail finishes)
//!                         ▼
//!     Client Response ◀── BufferedResponse
//! ```

use std::path::PathBuf;
use std::time::Instant;

use axum::http::StatusCode;
use clap::Parser;
use tokio::net::TcpListener;

use trie_dispatch::config::validation::validate_config;
use trie_dispatch::config::{load_config, ConfigError, ServerConfig};
use trie_dispatch::observability::{logging, metrics};
use trie_dispatch::{middleware, Context, Engine, HttpServer, RouteError, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "trie-dispatch")]
#[command(about = "Trie-routed HTTP dispatcher with grouped middleware", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);
    tracing::info!("trie-dispatch v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.limits.max_body_size,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    // A broken route table must stop startup before we accept traffic.
    let engine = demo_engine()?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(engine, config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Timing middleware scoped to the `/v2` group.
fn only_for_v2(c: &mut Context<'_>) {
    let start = Instant::now();
    c.next();
    tracing::info!(
        status = c.status().as_u16(),
        path = %c.path(),
        elapsed = ?start.elapsed(),
        "v2 request"
    );
}

fn demo_engine() -> Result<Engine, RouteError> {
    let mut engine = Engine::new();
    engine
        .use_middleware(middleware::logger())
        .use_middleware(middleware::metrics())
        .use_middleware(middleware::recovery());

    engine
        .get("/", |c| c.html(StatusCode::OK, "<h1>Hello</h1>"))?
        .get("/panic", |c| {
            let names = ["geektutu"];
            let index: usize = c.query("index").and_then(|i| i.parse().ok()).unwrap_or(100);
            c.string(StatusCode::OK, names[index]);
        })?;

    let mut v1 = engine.group("/v1");
    v1.get("/", |c| c.html(StatusCode::OK, "<h1>Hello v1</h1>"))?
        .get("/hello", |c| {
            let body = format!(
                "hello {}, you're at {}\n",
                c.query("name").unwrap_or_default(),
                c.path()
            );
            c.string(StatusCode::OK, body);
        })?;

    let mut v2 = engine.group("/v2");
    v2.use_middleware(only_for_v2);
    v2.get("/hello/:name", |c| {
        let body = format!(
            "hello {}, you're at {}\n",
            c.param("name").unwrap_or_default(),
            c.path()
        );
        c.string(StatusCode::OK, body);
    })?
    .post("/login", |c| {
        let body = serde_json::json!({
            "username": c.post_form("username"),
            "password": c.post_form("password"),
        });
        c.json(StatusCode::OK, &body);
    })?
    .get("/assets/*filepath", |c| {
        let body = serde_json::json!({ "filepath": c.param("filepath") });
        c.json(StatusCode::OK, &body);
    })?;

    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use trie_dispatch::{BufferedResponse, Request};

    #[test]
    fn test_demo_routes() {
        let engine = demo_engine().unwrap();

        let mut sink = BufferedResponse::new();
        engine.handle(Request::new(Method::GET, "/v2/hello/geektutu"), &mut sink);
        assert_eq!(sink.body_text(), "hello geektutu, you're at /v2/hello/geektutu\n");

        let mut sink = BufferedResponse::new();
        let status = engine.handle(Request::new(Method::GET, "/panic"), &mut sink);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(sink.body_text(), "Internal Server Error");
    }
}
