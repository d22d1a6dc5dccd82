//! Route table: one trie per HTTP method.
//!
//! # Responsibilities
//! - Register `(method, pattern)` pairs and their handlers
//! - Resolve a concrete `(method, path)` to a handler plus path parameters
//! - Return an explicit no-match rather than a silent default
//!
//! # Design Decisions
//! - Built once at startup, read-only afterwards (shared without locks)
//! - Handlers are stored under the canonical key `METHOD-/normalized/pattern`
//! - Duplicate registrations are rejected, not overwritten

use std::collections::HashMap;

use axum::http::Method;

use crate::routing::pattern::{normalize, parse_pattern, split_path};
use crate::routing::trie::Node;
use crate::routing::{Params, RouteError};

/// A successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    /// The registered pattern that matched, e.g. `/user/:name`.
    pub pattern: &'a str,
    pub handler: &'a H,
    pub params: Params,
}

/// Method-keyed collection of path tries.
#[derive(Debug)]
pub struct Router<H> {
    roots: HashMap<String, Node>,
    handlers: HashMap<String, H>,
    routes: Vec<(Method, String)>,
}

fn route_key(method: &str, pattern: &str) -> String {
    format!("{}-{}", method, pattern)
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self {
            roots: HashMap::new(),
            handlers: HashMap::new(),
            routes: Vec::new(),
        }
    }

    /// Register a handler for `method` and `pattern`.
    pub fn register(&mut self, method: Method, pattern: &str, handler: H) -> Result<(), RouteError> {
        let segments = parse_pattern(pattern)?;
        let normalized = normalize(&segments);

        self.roots
            .entry(method.as_str().to_string())
            .or_default()
            .insert(method.as_str(), &segments, &normalized)?;

        tracing::debug!(method = %method, pattern = %normalized, "Route registered");

        self.handlers
            .insert(route_key(method.as_str(), &normalized), handler);
        self.routes.push((method, normalized));
        Ok(())
    }

    /// Look up the handler for a concrete request path.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        let root = self.roots.get(method.as_str())?;
        let found = root.resolve(&split_path(path))?;
        let handler = self.handlers.get(&route_key(method.as_str(), found.pattern))?;

        Some(RouteMatch {
            pattern: found.pattern,
            handler,
            params: found.params,
        })
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> &[(Method, String)] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}
