//! Request metrics middleware.

use std::time::Instant;

use crate::context::Context;
use crate::observability::metrics::record_request;

/// Record request count and latency, labelled by method, route and status.
///
/// Unmatched requests are labelled with route `none` to keep cardinality bounded.
pub fn metrics() -> impl Fn(&mut Context<'_>) + Send + Sync + 'static {
    |c: &mut Context<'_>| {
        let start = Instant::now();
        c.next();
        record_request(
            c.method().as_str(),
            c.status().as_u16(),
            c.full_path().unwrap_or("none"),
            start,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{BufferedResponse, Request};
    use crate::engine::Engine;
    use axum::http::{Method, StatusCode};

    #[test]
    fn test_metrics_without_recorder_is_transparent() {
        let mut engine = Engine::new();
        engine.group("/api").use_middleware(metrics());
        engine
            .get("/api/ping", |c| c.string(StatusCode::OK, "pong"))
            .unwrap();

        let mut sink = BufferedResponse::new();
        engine.handle(Request::new(Method::GET, "/api/ping"), &mut sink);
        assert_eq!(sink.body_text(), "pong");

        let mut sink = BufferedResponse::new();
        let status = engine.handle(Request::new(Method::GET, "/api/missing"), &mut sink);
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
