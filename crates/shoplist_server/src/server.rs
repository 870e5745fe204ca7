//! HTTP transport: worker pool over a shared `tiny_http` listener.
//!
//! # Responsibility
//! - Accept requests on a fixed pool of worker threads.
//! - Short-circuit cross-origin preflights before routing.
//! - Route, dispatch and render each request into one reply.
//!
//! # Invariants
//! - The store is the only state shared between workers. Each worker opens
//!   its own session and serves every request on it.
//! - Every error is converted to a reply here; none escape a worker.

use crate::dispatch::dispatch_sqlite;
use crate::response::{ApiError, HttpReply};
use crate::router::resolve;
use log::{error, info, warn};
use shoplist_core::{Session, Store};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tiny_http::{Method, Request, Server};

#[derive(Debug)]
pub enum ServerError {
    Bind { addr: SocketAddr, message: String },
    Spawn(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bind { addr, message } => write!(f, "failed to bind {addr}: {message}"),
            Self::Spawn(err) => write!(f, "failed to spawn worker: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bind { .. } => None,
            Self::Spawn(err) => Some(err),
        }
    }
}

/// Handles one request. OPTIONS is answered without touching the store.
pub fn handle_request(session: &Session<'_>, method: &Method, url: &str, body: &[u8]) -> HttpReply {
    if *method == Method::Options {
        return HttpReply::preflight();
    }

    let outcome = resolve(method, url)
        .map_err(ApiError::from)
        .and_then(|route| session.with_connection(|conn| dispatch_sqlite(route, body, conn)));

    match outcome {
        Ok(reply) => reply.into(),
        Err(err) => {
            if err.status() >= 500 {
                error!(
                    "event=http_request module=server status=error method={} path={} error={}",
                    method, url, err
                );
            }
            err.into()
        }
    }
}

/// Bound listener plus the workers serving it.
pub struct ApiServer {
    http: Arc<Server>,
    store: Arc<Store>,
    workers: usize,
}

/// Stops a running [`ApiServer`] from another thread.
#[derive(Clone)]
pub struct ServerHandle {
    http: Arc<Server>,
    workers: usize,
}

impl ServerHandle {
    /// Wakes every blocked worker so `run` returns.
    pub fn shutdown(&self) {
        for _ in 0..self.workers {
            self.http.unblock();
        }
    }
}

impl ApiServer {
    pub fn bind(addr: SocketAddr, store: Arc<Store>, workers: usize) -> Result<Self, ServerError> {
        let http = Server::http(addr).map_err(|err| ServerError::Bind {
            addr,
            message: err.to_string(),
        })?;
        Ok(Self {
            http: Arc::new(http),
            store,
            workers: workers.max(1),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.http.server_addr().to_ip()
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            http: Arc::clone(&self.http),
            workers: self.workers,
        }
    }

    /// Serves requests until [`ServerHandle::shutdown`] is called.
    pub fn run(self) -> Result<(), ServerError> {
        info!(
            "event=server_start module=server status=ok addr={} workers={}",
            self.local_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            self.workers
        );

        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(self.workers);
        for index in 0..self.workers {
            let http = Arc::clone(&self.http);
            let store = Arc::clone(&self.store);
            let handle = thread::Builder::new()
                .name(format!("http-worker-{index}"))
                .spawn(move || worker_loop(&http, &store))
                .map_err(ServerError::Spawn)?;
            handles.push(handle);
        }

        for handle in handles {
            if handle.join().is_err() {
                error!("event=worker_exit module=server status=error reason=panic");
            }
        }
        info!("event=server_stop module=server status=ok");
        Ok(())
    }
}

fn worker_loop(http: &Server, store: &Store) {
    let session = match store.session() {
        Ok(session) => session,
        Err(err) => {
            error!(
                "event=worker_start module=server status=error error_code=session_open_failed error={}",
                err
            );
            return;
        }
    };

    loop {
        match http.recv() {
            Ok(request) => serve(&session, request),
            Err(err) => {
                warn!(
                    "event=http_recv module=server status=error error={}",
                    err
                );
                break;
            }
        }
    }
}

fn serve(session: &Session<'_>, mut request: Request) {
    let started_at = Instant::now();
    let method = request.method().clone();
    let url = request.url().to_string();

    let mut body = Vec::new();
    let reply = match request.as_reader().read_to_end(&mut body) {
        Ok(_) => handle_request(session, &method, &url, &body),
        Err(err) => HttpReply::from(ApiError::BadBody(err.to_string())),
    };
    let status = reply.status;

    if let Err(err) = request.respond(reply.into_response()) {
        warn!(
            "event=http_respond module=server status=error method={} path={} error={}",
            method, url, err
        );
        return;
    }

    info!(
        "event=http_request module=server status=ok method={} path={} status_code={} duration_ms={}",
        method,
        url,
        status,
        started_at.elapsed().as_millis()
    );
}
