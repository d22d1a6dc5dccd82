//! HTTP protocol adapter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve, tower-http layers: request id, trace, timeout)
//!     → fallback handler (decode path, collect body, build core Request)
//!     → Engine::handle on a blocking worker with a BufferedResponse sink
//!     → axum Response to client
//! ```
//!
//! # Design Decisions
//! - Axum does no routing here; every request lands in the fallback
//! - Timeouts and body limits live in this layer, never in the handler chain

pub mod request_id;
pub mod server;

pub use request_id::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
