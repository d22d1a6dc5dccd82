//! Response sink.
//!
//! # Responsibilities
//! - Define the minimal sink the dispatch core writes through
//! - Provide a buffering sink the HTTP adapter turns into an axum response
//!
//! # Design Decisions
//! - The core never buffers; buffering is a property of the sink
//! - `set_header` replaces any previous value for the same name
//! - Invalid header names/values are logged and dropped, not fatal

use std::borrow::Cow;
use std::io;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;

/// Where handlers send status, headers and body bytes.
pub trait ResponseWriter {
    fn set_status(&mut self, status: StatusCode);

    fn set_header(&mut self, name: &str, value: &str);

    /// May be called any number of times; bytes are appended.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Discard status, headers and body written so far.
    fn reset(&mut self);
}

/// Collects the response in memory.
#[derive(Debug)]
pub struct BufferedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Convert into an axum response.
    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl Default for BufferedResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter for BufferedResponse {
    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn set_header(&mut self, name: &str, value: &str) {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(header = %name, "Dropping header with invalid name");
                return;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(v) => {
                self.headers.insert(name, v);
            }
            Err(_) => {
                tracing::warn!(header = %name, "Dropping header with invalid value");
            }
        }
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(bytes);
        Ok(())
    }

    fn reset(&mut self) {
        self.status = StatusCode::OK;
        self.headers.clear();
        self.body.clear();
    }
}
