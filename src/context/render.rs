//! Response shortcuts and request accessors on [`Context`].

use axum::http::{header, StatusCode};
use serde::Serialize;

use crate::context::Context;

impl Context<'_> {
    /// First value of `key` in the query string.
    pub fn query(&self, key: &str) -> Option<String> {
        self.request().query(key)
    }

    /// Form value from an urlencoded body, or the query string.
    pub fn post_form(&self, key: &str) -> Option<String> {
        self.request().form_value(key)
    }

    /// Request header as text, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request()
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
    }

    pub fn string(&mut self, status: StatusCode, body: impl AsRef<str>) {
        self.respond(status, "text/plain", body.as_ref().as_bytes());
    }

    /// Serialize `value` as JSON. A serialization failure is answered with a 500.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.respond(status, "application/json", &bytes),
            Err(err) => {
                tracing::error!(path = %self.path(), error = %err, "JSON encoding failed");
                self.respond(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "text/plain; charset=utf-8",
                    format!("{}\n", err).as_bytes(),
                );
            }
        }
    }

    pub fn data(&mut self, status: StatusCode, bytes: &[u8]) {
        self.respond(status, "application/octet-stream", bytes);
    }

    pub fn html(&mut self, status: StatusCode, html: impl AsRef<str>) {
        self.respond(status, "text/html", html.as_ref().as_bytes());
    }

    fn respond(&mut self, status: StatusCode, content_type: &str, body: &[u8]) {
        self.set_header(header::CONTENT_TYPE.as_str(), content_type);
        self.set_status(status);
        if let Err(err) = self.write(body) {
            tracing::warn!(path = %self.path(), error = %err, "Response write failed");
        }
    }
}
