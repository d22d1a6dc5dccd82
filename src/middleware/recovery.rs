//! Panic recovery middleware.
//!
//! A panic unwinds through every handler between the fault and the nearest
//! `recovery()`, skipping their post-processing. Middleware registered before
//! `recovery()` still get their post-`next()` code run. Anything the failed
//! handlers already wrote is discarded before the 500 goes out.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use axum::http::StatusCode;

use crate::context::Context;

/// Catch panics from the downstream chain and answer with a 500.
pub fn recovery() -> impl Fn(&mut Context<'_>) + Send + Sync + 'static {
    |c: &mut Context<'_>| {
        let frame = c.frame();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| c.next()));
        if let Err(payload) = outcome {
            c.restore_frame(frame);
            tracing::error!(
                method = %c.method(),
                path = %c.path(),
                panic = %panic_message(payload.as_ref()),
                "Handler panicked"
            );
            c.reset();
            c.string(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{BufferedResponse, Request};
    use crate::engine::Engine;
    use axum::http::Method;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_panic_becomes_500_and_outer_post_runs() {
        let trace: Arc<Mutex<Vec<&'static str>>> = Default::default();
        let outer = trace.clone();

        let mut engine = Engine::new();
        engine.use_middleware(move |c| {
            outer.lock().unwrap().push("outer-pre");
            c.next();
            outer.lock().unwrap().push("outer-post");
        });
        engine.use_middleware(recovery());
        engine
            .get("/panic", |c| {
                let names = vec!["geektutu"];
                c.string(StatusCode::OK, names[100]);
            })
            .unwrap();

        let mut sink = BufferedResponse::new();
        let status = engine.handle(Request::new(Method::GET, "/panic"), &mut sink);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(sink.body_text(), "Internal Server Error");
        assert_eq!(*trace.lock().unwrap(), vec!["outer-pre", "outer-post"]);
    }

    #[test]
    fn test_partial_response_discarded_on_panic() {
        let mut engine = Engine::new();
        engine.use_middleware(recovery());
        engine
            .get("/half", |c| {
                c.set_header("x-handler", "half");
                c.json(StatusCode::OK, &serde_json::json!({ "partial": true }));
                panic!("failed after writing");
            })
            .unwrap();

        let mut sink = BufferedResponse::new();
        let status = engine.handle(Request::new(Method::GET, "/half"), &mut sink);

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(sink.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(sink.header("content-type"), Some("text/plain"));
        assert_eq!(sink.header("x-handler"), None);
        assert_eq!(sink.body_text(), "Internal Server Error");
    }

    #[test]
    fn test_no_panic_passes_through() {
        let mut engine = Engine::new();
        engine.use_middleware(recovery());
        engine.get("/ok", |c| c.string(StatusCode::OK, "ok")).unwrap();

        let mut sink = BufferedResponse::new();
        assert_eq!(
            engine.handle(Request::new(Method::GET, "/ok"), &mut sink),
            StatusCode::OK
        );
        assert_eq!(sink.body_text(), "ok");
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(boxed.as_ref()), "static");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic payload");
    }
}
