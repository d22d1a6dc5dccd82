//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::http::Method;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use trie_dispatch::{BufferedResponse, Context, Engine, HttpServer, Request, ServerConfig, Shutdown};

/// Ordered record of what ran, shared between handlers.
pub type Trace = Arc<Mutex<Vec<String>>>;

pub fn trace() -> Trace {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(trace: &Trace) -> Vec<String> {
    trace.lock().unwrap().clone()
}

pub fn record(trace: &Trace, entry: impl Into<String>) {
    trace.lock().unwrap().push(entry.into());
}

/// Middleware recording `<name>-pre` and `<name>-post` around a single `next()`.
pub fn recording(trace: &Trace, name: &'static str) -> impl Fn(&mut Context<'_>) + Send + Sync + 'static {
    let trace = trace.clone();
    move |c: &mut Context<'_>| {
        record(&trace, format!("{}-pre", name));
        c.next();
        record(&trace, format!("{}-post", name));
    }
}

/// Terminal handler recording `name` and answering 200 with `name` as the body.
pub fn answering(trace: &Trace, name: &'static str) -> impl Fn(&mut Context<'_>) + Send + Sync + 'static {
    let trace = trace.clone();
    move |c: &mut Context<'_>| {
        record(&trace, name);
        c.string(axum::http::StatusCode::OK, name);
    }
}

pub fn dispatch(engine: &Engine, method: Method, path: &str) -> BufferedResponse {
    let mut sink = BufferedResponse::new();
    engine.handle(Request::new(method, path), &mut sink);
    sink
}

/// A server running on an ephemeral port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
    }
}

pub async fn start_server(engine: Engine, config: ServerConfig) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(engine, config);
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    RunningServer {
        addr,
        shutdown,
        handle,
    }
}
