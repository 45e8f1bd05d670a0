// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Self-healing telemetry stream from the hotspot.
//!
//! The reader cycles through three states for the life of the process:
//!
//! - **Connecting**: dial the device and send the stream request. Failure
//!   goes to Cooldown.
//! - **Streaming**: read lines, decode them, update the fix store. A line that
//!   does not decode is skipped. A read error or end of stream goes to
//!   Cooldown.
//! - **Cooldown**: the fix store is cleared once, then the reader sleeps for
//!   the configured interval and goes back to Connecting.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use mifi_gps_proto::nmea::parse_sentence;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, trace, warn};

use crate::error::StreamError;
use crate::fix_store::FixStore;

mod metrics;
mod preamble;

pub use self::metrics::{ReaderMetrics, ReaderMetricsSnapshot};
pub use self::preamble::{PREAMBLE, PreambleStream};

/// Longest telemetry line accepted, terminator included. NMEA caps
/// sentences at 82 bytes; the slack covers NUL padding.
pub const MAX_LINE_LEN: usize = 4096;

/// What happened to one line of the stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineOutcome {
    /// Empty or padding-only line, ignored.
    Skipped,
    /// Decoded and stored; carries the sentence type.
    Stored(&'static str),
    /// Could not be decoded; the store was not touched.
    Rejected,
}

/// Strip line terminators and NUL padding. Returns `None` if nothing is left.
pub fn frame_line(raw: &[u8]) -> Option<&[u8]> {
    let is_padding = |b: &u8| *b == 0 || b.is_ascii_whitespace();
    let start = raw.iter().position(|b| !is_padding(b))?;
    let end = raw.iter().rposition(|b| !is_padding(b))?;
    Some(&raw[start..=end])
}

/// Frame, decode and store one raw line.
///
/// Decode failures are counted and logged at debug level only.
pub fn ingest_line(store: &FixStore, metrics: &ReaderMetrics, raw: &[u8]) -> LineOutcome {
    let Some(line) = frame_line(raw) else {
        return LineOutcome::Skipped;
    };
    metrics.inc_lines_received();

    let Ok(text) = std::str::from_utf8(line) else {
        debug!(line = %String::from_utf8_lossy(line), "skipping non-UTF-8 line");
        metrics.inc_decode_errors();
        return LineOutcome::Rejected;
    };

    match parse_sentence(text) {
        Ok(fragment) => {
            let kind = fragment.kind();
            trace!(kind, "parsed sentence");
            store.update(fragment);
            metrics.inc_fragments_decoded();
            LineOutcome::Stored(kind)
        }
        Err(error) => {
            debug!(
                %error,
                unsupported = error.is_unsupported(),
                line = text,
                "skipping undecodable line"
            );
            metrics.inc_decode_errors();
            LineOutcome::Rejected
        }
    }
}

/// Keeps the [`FixStore`] current from the device's telemetry endpoint.
#[derive(Debug)]
pub struct StreamReader {
    device_addr: String,
    cooldown: Duration,
    store: Arc<FixStore>,
    metrics: Arc<ReaderMetrics>,
}

impl StreamReader {
    /// Create a reader for `device_addr` (`host:port`) with a one minute
    /// cooldown.
    pub fn new(device_addr: impl Into<String>, store: Arc<FixStore>) -> Self {
        Self {
            device_addr: device_addr.into(),
            cooldown: Duration::from_secs(60),
            store,
            metrics: Arc::new(ReaderMetrics::new()),
        }
    }

    /// Set the wait between a failure and the next connection attempt.
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Count into an existing metrics instance.
    pub fn with_metrics(mut self, metrics: Arc<ReaderMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Shared handle to this reader's counters.
    pub fn metrics(&self) -> Arc<ReaderMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the connect/stream/cooldown cycle forever.
    pub async fn run(self) {
        info!(device = %self.device_addr, "starting GPS stream reader");
        loop {
            let error = match self.stream_once().await {
                Ok(never) => match never {},
                Err(e) => e,
            };
            warn!(device = %self.device_addr, %error, "error getting GPS");
            self.metrics.inc_stream_failures();
            self.store.clear();
            self.metrics.inc_store_clears();

            tokio::time::sleep(self.cooldown).await;
        }
    }

    /// Connect and stream until the connection fails.
    pub async fn stream_once(&self) -> Result<Infallible, StreamError> {
        self.metrics.inc_connect_attempts();
        let socket = TcpStream::connect(&self.device_addr)
            .await
            .map_err(|source| StreamError::Connect {
                addr: self.device_addr.clone(),
                source,
            })?;

        let mut conn = PreambleStream::new(socket);
        conn.write_all(stream_request(&self.device_addr).as_bytes())
            .await
            .map_err(StreamError::Request)?;
        info!(device = %self.device_addr, "connected to GPS stream");

        let mut reader = BufReader::new(conn);
        read_response_head(&mut reader).await?;

        let mut line = Vec::with_capacity(128);
        loop {
            read_line_bounded(&mut reader, &mut line).await?;
            ingest_line(&self.store, &self.metrics, &line);
        }
    }
}

/// Read one `\n`-terminated line into `line`, at most [`MAX_LINE_LEN`] bytes.
async fn read_line_bounded<R>(reader: &mut R, line: &mut Vec<u8>) -> Result<(), StreamError>
where
    R: AsyncBufRead + Unpin,
{
    line.clear();
    let n = reader
        .take(MAX_LINE_LEN as u64)
        .read_until(b'\n', line)
        .await
        .map_err(StreamError::Read)?;
    if n == 0 {
        return Err(StreamError::EndOfStream);
    }
    if n == MAX_LINE_LEN && line.last() != Some(&b'\n') {
        return Err(StreamError::LineTooLong {
            limit: MAX_LINE_LEN,
        });
    }
    Ok(())
}

fn stream_request(host: &str) -> String {
    format!(
        "GET / HTTP/1.1\r\nHost: {host}\r\nUser-Agent: mifi-gps/{}\r\nAccept: */*\r\n\r\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Consume the status line and headers, up to the blank line.
async fn read_response_head<R>(reader: &mut R) -> Result<(), StreamError>
where
    R: AsyncBufRead + Unpin,
{
    let mut status_line = String::new();
    if reader
        .read_line(&mut status_line)
        .await
        .map_err(StreamError::Read)?
        == 0
    {
        return Err(StreamError::EndOfStream);
    }
    let mut parts = status_line.split_whitespace();
    let ok = matches!(
        (parts.next(), parts.next()),
        (Some(version), Some("200")) if version.starts_with("HTTP/1.")
    );
    if !ok {
        return Err(StreamError::BadStatus {
            status_line: status_line.trim_end().to_string(),
        });
    }

    let mut header = String::new();
    loop {
        header.clear();
        if reader
            .read_line(&mut header)
            .await
            .map_err(StreamError::Read)?
            == 0
        {
            return Err(StreamError::EndOfStream);
        }
        if header.trim_end().is_empty() {
            return Ok(());
        }
        trace!(header = header.trim_end(), "response header");
    }
}
