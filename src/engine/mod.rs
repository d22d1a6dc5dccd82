//! Request dispatcher.
//!
//! # Data Flow
//! ```text
//! Setup (mutable, before serving):
//!     Engine::new() → root group (prefix "")
//!     → group("/v1") / use_middleware(..) / get(..) ...
//!     → Arc<Engine> (read-only from here on)
//!
//! Per request (Engine::handle):
//!     Request + sink
//!     → every group whose prefix the path starts with contributes its middleware,
//!       in group creation order
//!     → router resolve(method, path): route handler, or the built-in not-found
//!     → Context chain starts at index 0
//! ```
//!
//! # Design Decisions
//! - Group prefixes are precomputed, so dispatch is a flat scan with no tree walk
//! - Groups are an arena indexed by `GroupId`; parents are ids, not references
//! - Dispatch holds no state between requests; everything lives in the Context

use std::sync::Arc;

use axum::http::{Method, StatusCode};

use crate::context::{Context, HandlerFunc, Request, ResponseWriter};
use crate::routing::{RouteError, Router};

pub mod group;

use group::{verb_methods, GroupData};
pub use group::{GroupId, RouterGroup};

/// Owns the route table and every group. Cheap to share behind an `Arc`.
pub struct Engine {
    router: Router<HandlerFunc>,
    groups: Vec<GroupData>,
    not_found: HandlerFunc,
}

fn not_found(c: &mut Context<'_>) {
    let body = format!("404 NOT FOUND: {}\n", c.path());
    c.string(StatusCode::NOT_FOUND, body);
}

impl Engine {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            groups: vec![GroupData::root()],
            not_found: Arc::new(not_found),
        }
    }

    /// Registration handle for the root group.
    pub fn root(&mut self) -> RouterGroup<'_> {
        RouterGroup::new(self, GroupId::ROOT)
    }

    /// Derive a subgroup of the root group.
    pub fn group(&mut self, suffix: &str) -> RouterGroup<'_> {
        let id = self.derive_group(GroupId::ROOT, suffix);
        RouterGroup::new(self, id)
    }

    /// Reopen an existing group for further registration.
    pub fn group_at(&mut self, id: GroupId) -> Option<RouterGroup<'_>> {
        if id.0 < self.groups.len() {
            Some(RouterGroup::new(self, id))
        } else {
            None
        }
    }

    /// Append middleware that runs for every request.
    pub fn use_middleware<F>(&mut self, middleware: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.append_middleware(GroupId::ROOT, [Arc::new(middleware) as HandlerFunc]);
        self
    }

    pub fn use_all<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.append_middleware(GroupId::ROOT, middlewares);
        self
    }

    /// Register `handler` on the root group.
    pub fn route<F>(&mut self, method: Method, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.add_route(GroupId::ROOT, method, pattern, Arc::new(handler))?;
        Ok(self)
    }

    verb_methods! {
        get => GET,
        post => POST,
        put => PUT,
        patch => PATCH,
        delete => DELETE,
        head => HEAD,
        options => OPTIONS,
    }

    /// Registered `(method, pattern)` pairs in registration order.
    pub fn routes(&self) -> &[(Method, String)] {
        self.router.routes()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Dispatch one request, writing the response through `writer`.
    ///
    /// Returns the last status set on the context.
    pub fn handle(&self, request: Request, writer: &mut dyn ResponseWriter) -> StatusCode {
        let mut chain: Vec<HandlerFunc> = self
            .groups
            .iter()
            .filter(|group| group.matches(request.path()))
            .flat_map(|group| group.middlewares.iter().cloned())
            .collect();
        let middleware_count = chain.len();

        let method = request.method().clone();
        let path = request.path().to_string();
        let mut ctx = Context::new(request, writer);

        match self.router.resolve(&method, &path) {
            Some(found) => {
                tracing::debug!(
                    method = %method,
                    path = %path,
                    route = %found.pattern,
                    middleware = middleware_count,
                    "Dispatching request"
                );
                chain.push(found.handler.clone());
                ctx.bind_route(found.pattern.to_string(), found.params);
            }
            None => {
                tracing::debug!(
                    method = %method,
                    path = %path,
                    middleware = middleware_count,
                    "No route matched"
                );
                chain.push(self.not_found.clone());
            }
        }

        if let Err(err) = ctx.run(chain) {
            tracing::error!(method = %method, path = %path, error = %err, "Handler chain failed to start");
        }
        ctx.status()
    }

    pub(crate) fn group_data(&self, id: GroupId) -> &GroupData {
        &self.groups[id.0]
    }

    pub(crate) fn derive_group(&mut self, parent: GroupId, suffix: &str) -> GroupId {
        let prefix = format!("{}{}", self.groups[parent.0].prefix, suffix);
        let id = GroupId(self.groups.len());
        tracing::debug!(prefix = %prefix, group = id.0, parent = parent.0, "Group created");
        self.groups.push(GroupData {
            prefix,
            middlewares: Vec::new(),
            parent: Some(parent),
        });
        id
    }

    pub(crate) fn append_middleware<I>(&mut self, id: GroupId, middlewares: I)
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.groups[id.0].middlewares.extend(middlewares);
    }

    pub(crate) fn add_route(
        &mut self,
        id: GroupId,
        method: Method,
        suffix: &str,
        handler: HandlerFunc,
    ) -> Result<(), RouteError> {
        let pattern = format!("{}{}", self.groups[id.0].prefix, suffix);
        self.router.register(method, &pattern, handler)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("routes", &self.router.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}
