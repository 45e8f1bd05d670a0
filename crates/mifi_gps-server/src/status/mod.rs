// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Minimal HTTP status endpoint.
//!
//! One request per connection. `GET /` renders the status page from a fresh
//! fix store snapshot, `GET /api/fix` returns the same snapshot as JSON,
//! `GET /api/metrics` returns the stream reader counters when a reader is
//! attached, and every other path is a 404. A rendering failure produces a
//! 500 for that request only.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::fix_store::FixStore;
use crate::stream::ReaderMetrics;

mod render;

pub use self::render::{HtmlStatusTemplate, StatusTemplate, StatusView};

/// Upper bound on the request head we are willing to read.
const MAX_REQUEST_HEAD: u64 = 8 * 1024;

/// Serves the status page until the task is dropped.
pub struct StatusServer {
    listener: TcpListener,
    handler: Arc<StatusHandler>,
}

struct StatusHandler {
    store: Arc<FixStore>,
    template: Arc<dyn StatusTemplate>,
    maps_api_key: Option<String>,
    metrics: Option<Arc<ReaderMetrics>>,
}

impl StatusServer {
    /// Bind the listening socket.
    pub async fn bind(
        addr: &str,
        store: Arc<FixStore>,
        template: Arc<dyn StatusTemplate>,
        maps_api_key: Option<String>,
    ) -> Result<Self, Error> {
        let listener = TcpListener::bind(addr).await.map_err(|source| Error::Bind {
            addr: addr.to_string(),
            source,
        })?;
        Ok(Self {
            listener,
            handler: Arc::new(StatusHandler {
                store,
                template,
                maps_api_key,
                metrics: None,
            }),
        })
    }

    /// Serve `metrics` on `/api/metrics`.
    pub fn with_reader_metrics(mut self, metrics: Arc<ReaderMetrics>) -> Self {
        // Not yet shared with any connection task.
        if let Some(handler) = Arc::get_mut(&mut self.handler) {
            handler.metrics = Some(metrics);
        }
        self
    }

    /// The address actually bound, useful with port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever.
    pub async fn run(self) {
        if let Ok(addr) = self.local_addr() {
            info!(%addr, "status page listening");
        }
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "failed to accept status connection");
                    continue;
                }
            };
            let handler = Arc::clone(&self.handler);
            tokio::spawn(async move {
                if let Err(e) = handler.handle_connection(stream).await {
                    debug!(%peer, error = %e, "status connection error");
                }
            });
        }
    }
}

impl std::fmt::Debug for StatusServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusServer")
            .field("local_addr", &self.listener.local_addr().ok())
            .finish_non_exhaustive()
    }
}

struct Response {
    status: &'static str,
    content_type: &'static str,
    body: String,
}

impl Response {
    fn ok(content_type: &'static str, body: String) -> Self {
        Self {
            status: "200 OK",
            content_type,
            body,
        }
    }

    fn text(status: &'static str, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: format!("{body}\n"),
        }
    }
}

impl StatusHandler {
    async fn handle_connection<S>(&self, mut stream: S) -> io::Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let Some(path) = read_request_path(&mut stream).await? else {
            return Ok(());
        };
        let response = self.route(&path);
        let head = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nCache-Control: no-store\r\nConnection: close\r\n\r\n",
            response.status,
            response.content_type,
            response.body.len()
        );
        stream.write_all(head.as_bytes()).await?;
        stream.write_all(response.body.as_bytes()).await?;
        stream.shutdown().await
    }

    fn route(&self, path: &str) -> Response {
        // Query strings are ignored.
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        match path {
            "/" => self.page(),
            "/api/fix" => json(&self.store.snapshot()),
            "/api/metrics" => match &self.metrics {
                Some(metrics) => json(&metrics.snapshot()),
                None => not_found(),
            },
            _ => not_found(),
        }
    }

    fn page(&self) -> Response {
        let fix = self.store.snapshot();
        let view = StatusView {
            fix: &fix,
            maps_api_key: self.maps_api_key.as_deref(),
            rendered_at: Utc::now(),
        };
        match self.template.render(&view) {
            Ok(body) => Response::ok(self.template.content_type(), body),
            Err(e) => {
                error!(error = %e, "failed to render status page");
                Response::text("500 Internal Server Error", "Internal Server Error")
            }
        }
    }
}

fn json<T: serde::Serialize>(value: &T) -> Response {
    match serde_json::to_string_pretty(value) {
        Ok(body) => Response::ok("application/json", body),
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            Response::text("500 Internal Server Error", "Internal Server Error")
        }
    }
}

fn not_found() -> Response {
    Response::text("404 Not Found", "Not Found")
}

/// Read the request head and return the target path.
///
/// Returns `None` if the client sent nothing usable.
async fn read_request_path<S>(stream: &mut S) -> io::Result<Option<String>>
where
    S: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream.take(MAX_REQUEST_HEAD));
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await? == 0 {
        return Ok(None);
    }

    // Drain headers so closing the socket does not reset the response.
    let mut header = String::new();
    loop {
        header.clear();
        if reader.read_line(&mut header).await? == 0 || header.trim_end().is_empty() {
            break;
        }
    }

    let mut parts = request_line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(_method), Some(path)) => Ok(Some(path.to_string())),
        _ => Ok(None),
    }
}
