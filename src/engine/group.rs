//! Route groups.
//!
//! A group is a path prefix plus the middleware attached to it. Groups form a
//! tree (each knows its parent), but they live in a flat arena owned by the
//! [`Engine`] so dispatch can test every prefix without walking the tree.

use std::sync::Arc;

use axum::http::Method;

use crate::context::{Context, HandlerFunc};
use crate::engine::Engine;
use crate::routing::RouteError;

/// Index of a group in the engine's arena. The root group is `GroupId::ROOT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
    pub const ROOT: GroupId = GroupId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena entry for one group.
pub(crate) struct GroupData {
    /// `parent.prefix + suffix`, fixed at creation.
    pub(crate) prefix: String,
    pub(crate) middlewares: Vec<HandlerFunc>,
    pub(crate) parent: Option<GroupId>,
}

impl GroupData {
    pub(crate) fn root() -> Self {
        Self {
            prefix: String::new(),
            middlewares: Vec::new(),
            parent: None,
        }
    }

    /// Plain string-prefix test: `/api` also covers `/apix`.
    pub(crate) fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Generates the per-verb registration shortcuts on a type with a `route` method.
macro_rules! verb_methods {
    ($($name:ident => $method:ident),* $(,)?) => {$(
        #[doc = concat!("Register a `", stringify!($method), "` route.")]
        pub fn $name<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
        where
            F: Fn(&mut Context<'_>) + Send + Sync + 'static,
        {
            self.route(Method::$method, pattern, handler)
        }
    )*};
}

pub(crate) use verb_methods;

/// Registration handle for one group, borrowing the engine mutably.
pub struct RouterGroup<'e> {
    engine: &'e mut Engine,
    id: GroupId,
}

impl<'e> RouterGroup<'e> {
    pub(crate) fn new(engine: &'e mut Engine, id: GroupId) -> Self {
        Self { engine, id }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn prefix(&self) -> &str {
        &self.engine.group_data(self.id).prefix
    }

    pub fn parent(&self) -> Option<GroupId> {
        self.engine.group_data(self.id).parent
    }

    /// Derive a subgroup whose prefix is this group's prefix plus `suffix`.
    pub fn group(&mut self, suffix: &str) -> RouterGroup<'_> {
        let id = self.engine.derive_group(self.id, suffix);
        RouterGroup::new(self.engine, id)
    }

    /// Like [`RouterGroup::group`], consuming this handle.
    pub fn into_group(self, suffix: &str) -> RouterGroup<'e> {
        let id = self.engine.derive_group(self.id, suffix);
        RouterGroup::new(self.engine, id)
    }

    /// Append middleware that runs for every request under this prefix.
    pub fn use_middleware<F>(&mut self, middleware: F) -> &mut Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.use_all([Arc::new(middleware) as HandlerFunc])
    }

    /// Append several middleware at once, keeping their order.
    pub fn use_all<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.engine.append_middleware(self.id, middlewares);
        self
    }

    /// Register `handler` for `method` at this group's prefix plus `pattern`.
    pub fn route<F>(&mut self, method: Method, pattern: &str, handler: F) -> Result<&mut Self, RouteError>
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        self.engine.add_route(self.id, method, pattern, Arc::new(handler))?;
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
}
