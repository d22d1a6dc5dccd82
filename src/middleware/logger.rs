//! Request logging middleware.

use std::time::Instant;

use crate::context::Context;

/// Log method, path, matched route, final status and latency for each request.
pub fn logger() -> impl Fn(&mut Context<'_>) + Send + Sync + 'static {
    |c: &mut Context<'_>| {
        let start = Instant::now();
        c.next();
        tracing::info!(
            status = c.status().as_u16(),
            method = %c.method(),
            path = %c.path(),
            route = c.full_path().unwrap_or("-"),
            request_id = c.header("x-request-id").unwrap_or("-"),
            elapsed = ?start.elapsed(),
            "Request completed"
        );
    }
}
