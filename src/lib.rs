//! HTTP request-dispatch core.
//!
//! Routes are matched by a per-method segment trie (literal > `:param` > `*wildcard`),
//! middleware is attached to path-prefix groups, and each request runs as a fixed
//! chain of handlers that continue explicitly with [`Context::next`].
//!
//! ```no_run
//! use axum::http::StatusCode;
//! use trie_dispatch::{middleware, Engine};
//!
//! # fn main() -> Result<(), trie_dispatch::RouteError> {
//! let mut engine = Engine::new();
//! engine.use_middleware(middleware::logger());
//! engine.get("/hello/:name", |c| {
//!     let body = format!("hello {}", c.param("name").unwrap_or_default());
//!     c.string(StatusCode::OK, body);
//! })?;
//!
//! let mut v1 = engine.group("/v1");
//! v1.get("/assets/*filepath", |c| {
//!     let body = serde_json::json!({ "filepath": c.param("filepath") });
//!     c.json(StatusCode::OK, &body);
//! })?;
//! # Ok(())
//! # }
//! ```

// Core dispatch
pub mod context;
pub mod engine;
pub mod middleware;
pub mod routing;

// Serving and cross-cutting concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use context::{BufferedResponse, ChainError, Context, HandlerFunc, Request, ResponseWriter};
pub use engine::{Engine, GroupId, RouterGroup};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RouteError;
