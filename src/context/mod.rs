//! Per-request context and the handler chain.
//!
//! # Data Flow
//! ```text
//! Engine::handle
//!     → Context::new(request, sink)
//!     → chain fixed: [group middleware..., route handler | not-found]
//!     → next() enters handler 0
//!         handler i: pre-processing
//!         → next() enters handler i+1 ... returns when the tail has finished
//!         handler i: post-processing
//!     → finished
//! ```
//!
//! # Design Decisions
//! - The chain is fixed before execution and never mutated while running
//! - The cursor only moves forward; each handler is entered at most once
//! - A handler that does not call `next()` short-circuits everything after it
//! - Calling `next()` twice from one handler is a programmer error and is rejected

use std::fmt;
use std::io;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::routing::Params;

pub mod render;
pub mod request;
pub mod writer;

pub use request::Request;
pub use writer::{BufferedResponse, ResponseWriter};

/// A unit of work in the chain: middleware or terminal route handler.
pub type HandlerFunc = Arc<dyn Fn(&mut Context<'_>) + Send + Sync>;

/// Misuse of the chain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("handler at chain index {index} already called next()")]
    AlreadyAdvanced { index: usize },

    #[error("handler chain has already been started")]
    AlreadyStarted,
}

/// Where execution currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    NotStarted,
    /// The handler at this index is executing (before or after its `next()`).
    Running(usize),
    Finished,
}

/// Everything a handler can see and do for one request.
pub struct Context<'w> {
    request: Request,
    writer: &'w mut dyn ResponseWriter,
    status: StatusCode,
    params: Params,
    full_path: Option<String>,

    handlers: Vec<HandlerFunc>,
    advanced: Vec<bool>,
    /// Highest chain index entered so far.
    cursor: Option<usize>,
    /// Chain index of the handler currently on the stack.
    current: Option<usize>,
}

impl<'w> Context<'w> {
    pub fn new(request: Request, writer: &'w mut dyn ResponseWriter) -> Self {
        Self {
            request,
            writer,
            status: StatusCode::OK,
            params: Params::new(),
            full_path: None,
            handlers: Vec::new(),
            advanced: Vec::new(),
            cursor: None,
            current: None,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn path(&self) -> &str {
        self.request.path()
    }

    /// Status most recently set through this context.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Path parameter captured by the matched route.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The registered pattern that matched, `None` when no route did.
    pub fn full_path(&self) -> Option<&str> {
        self.full_path.as_deref()
    }

    pub fn chain_state(&self) -> ChainState {
        match (self.current, self.cursor) {
            (Some(index), _) => ChainState::Running(index),
            (None, Some(_)) => ChainState::Finished,
            (None, None) => ChainState::NotStarted,
        }
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
        self.writer.set_status(status);
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.writer.set_header(name, value);
    }

    pub fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write(bytes)
    }

    /// Drop whatever has been written so far and start the response over.
    pub fn reset(&mut self) {
        self.status = StatusCode::OK;
        self.writer.reset();
    }

    /// Run the rest of the chain, returning once it has completed.
    ///
    /// # Panics
    ///
    /// Panics if the calling handler already called `next()`. Use
    /// [`Context::try_next`] to handle that case instead.
    pub fn next(&mut self) {
        if let Err(err) = self.try_next() {
            panic!("{}", err);
        }
    }

    /// Like [`Context::next`], but reports cursor misuse as an error.
    pub fn try_next(&mut self) -> Result<(), ChainError> {
        let caller = self.current;
        let index = match caller {
            Some(i) => {
                if self.advanced[i] {
                    return Err(ChainError::AlreadyAdvanced { index: i });
                }
                self.advanced[i] = true;
                i + 1
            }
            None => {
                if self.cursor.is_some() {
                    return Err(ChainError::AlreadyStarted);
                }
                0
            }
        };

        // End of chain: nothing downstream of the terminal handler.
        let Some(handler) = self.handlers.get(index).cloned() else {
            return Ok(());
        };

        self.cursor = Some(index);
        self.current = Some(index);
        handler(self);
        self.current = caller;
        Ok(())
    }

    pub(crate) fn bind_route(&mut self, pattern: String, params: Params) {
        self.full_path = Some(pattern);
        self.params = params;
    }

    /// Fix the chain and start it at index 0.
    pub(crate) fn run(&mut self, handlers: Vec<HandlerFunc>) -> Result<(), ChainError> {
        if self.cursor.is_some() {
            return Err(ChainError::AlreadyStarted);
        }
        self.advanced = vec![false; handlers.len()];
        self.handlers = handlers;
        self.try_next()
    }

    /// Handler index on the stack, used to rewind after an unwinding panic.
    pub(crate) fn frame(&self) -> Option<usize> {
        self.current
    }

    pub(crate) fn restore_frame(&mut self, frame: Option<usize>) {
        self.current = frame;
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("method", self.request.method())
            .field("path", &self.request.path())
            .field("status", &self.status)
            .field("params", &self.params)
            .field("full_path", &self.full_path)
            .field("chain_len", &self.handlers.len())
            .field("state", &self.chain_state())
            .finish()
    }
}
