//! Built-in middleware.
//!
//! # Data Flow
//! ```text
//! engine.use_middleware(logger())     // logs status/route/latency after next()
//! engine.use_middleware(metrics())    // counters + latency histogram per route
//! engine.use_middleware(recovery())   // inside both: panics still get logged and counted as 500s
//! ```
//!
//! Each constructor returns a closure ready for `use_middleware`. All of them
//! call `next()` exactly once.

pub mod logger;
pub mod metrics;
pub mod recovery;

pub use self::logger::logger;
pub use self::metrics::metrics;
pub use self::recovery::recovery;
