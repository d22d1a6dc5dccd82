//! Inbound request as seen by handlers.
//!
//! The HTTP adapter fills this in from the wire request. The path is already
//! percent-decoded; query and form values are decoded lazily on lookup.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method};

/// Method, path and the raw material for query/form lookups.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Attach the raw query string (without the leading `?`).
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// First value of `key` in the query string.
    pub fn query(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        lookup(query.as_bytes(), key)
    }

    /// First value of `key` in an urlencoded body, falling back to the query string.
    pub fn form_value(&self, key: &str) -> Option<String> {
        if self.is_urlencoded_form() {
            if let Some(value) = lookup(&self.body, key) {
                return Some(value);
            }
        }
        self.query(key)
    }

    fn is_urlencoded_form(&self) -> bool {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false)
    }
}

fn lookup(encoded: &[u8], key: &str) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_query_lookup() {
        let req = Request::new(Method::GET, "/search").with_query("q=rust+trie&page=2&q=other");
        assert_eq!(req.query("q").as_deref(), Some("rust trie"));
        assert_eq!(req.query("page").as_deref(), Some("2"));
        assert_eq!(req.query("missing"), None);
        assert_eq!(Request::new(Method::GET, "/").query("q"), None);
    }

    #[test]
    fn test_form_value_prefers_body() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let req = Request::new(Method::POST, "/login")
            .with_query("username=fromquery&next=%2Fhome")
            .with_headers(headers)
            .with_body("username=geektutu&password=1234");

        assert_eq!(req.form_value("username").as_deref(), Some("geektutu"));
        assert_eq!(req.form_value("password").as_deref(), Some("1234"));
        assert_eq!(req.form_value("next").as_deref(), Some("/home"));
    }

    #[test]
    fn test_form_value_ignores_non_form_body() {
        let req = Request::new(Method::POST, "/login").with_body("username=x");
        assert_eq!(req.form_value("username"), None);
    }
}
