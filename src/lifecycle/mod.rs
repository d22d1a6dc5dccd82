//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Register routes → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or explicit trigger → broadcast → server stops accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then route table, then listener
//! - Route registration errors are fatal before the listener is bound

pub mod shutdown;

pub use shutdown::Shutdown;
