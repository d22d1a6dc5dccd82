//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     "/assets/:kind/*filepath"
//!     → pattern.rs (split, classify segments, reject malformed)
//!     → trie.rs (walk/create nodes under the method's root)
//!     → router.rs (store handler under "METHOD-/pattern")
//!
//! Incoming Request (method, path)
//!     → router.rs (pick the method's trie)
//!     → trie.rs (greedy walk: literal > param > wildcard)
//!     → Return: handler + path parameters, or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex and no backtracking in the hot path
//! - Deterministic: same input always matches same route
//! - Malformed or duplicate routes fail registration instead of failing requests

use std::collections::HashMap;

use thiserror::Error;

pub mod pattern;
pub mod router;
pub mod trie;

pub use router::{RouteMatch, Router};

/// Path parameters captured during resolution, keyed by name.
pub type Params = HashMap<String, String>;

/// Errors raised while registering routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// `*name` appears anywhere but the last segment, or more than once.
    #[error("wildcard must be the last segment of route `{pattern}`")]
    WildcardNotLast { pattern: String },

    /// `:` or `*` without a name.
    #[error("parameter or wildcard without a name in route `{pattern}`")]
    EmptyName { pattern: String },

    /// Two segments of one pattern capture under the same name.
    #[error("name `{name}` is captured more than once in route `{pattern}`")]
    DuplicateName { pattern: String, name: String },

    /// The same method and pattern were registered twice.
    #[error("route `{method} {pattern}` is already registered")]
    Duplicate { method: String, pattern: String },

    /// A different parameter name already occupies this position.
    #[error("parameter `:{name}` in route `{pattern}` conflicts with existing `:{existing}`")]
    ParamConflict {
        pattern: String,
        name: String,
        existing: String,
    },

    /// A different wildcard name already occupies this position.
    #[error("wildcard `*{name}` in route `{pattern}` conflicts with existing `*{existing}`")]
    WildcardConflict {
        pattern: String,
        name: String,
        existing: String,
    },
}
