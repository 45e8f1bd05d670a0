// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Transport shim for the device's header-less HTTP stream.
//!
//! The hotspot answers a `GET` with raw NMEA text and no status line or
//! headers (HTTP/0.9 style). [`PreambleStream`] makes the connection look like
//! an ordinary HTTP/1.1 response by serving a fixed response head before the
//! first byte read from the socket. Everything after that passes through
//! untouched, and writes are never altered.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Response head served before any socket data.
pub const PREAMBLE: &[u8] =
    b"HTTP/1.1 200 OK\r\nConnection: keep-alive\r\nContent-Type: text/plain\r\n\r\n";

/// Wraps a connection and prepends [`PREAMBLE`] to its read side.
#[derive(Debug)]
pub struct PreambleStream<S> {
    inner: S,
    pending: &'static [u8],
}

impl<S> PreambleStream<S> {
    /// Wrap a freshly opened connection.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: PREAMBLE,
        }
    }

    /// Returns `true` once the whole preamble has been read.
    pub fn preamble_consumed(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for PreambleStream<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if !this.pending.is_empty() {
            // Small buffers get the preamble across several reads.
            let n = this.pending.len().min(buf.remaining());
            buf.put_slice(&this.pending[..n]);
            this.pending = &this.pending[n..];
            return Poll::Ready(Ok(()));
        }
        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for PreambleStream<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_preamble_then_passthrough() {
        let (client, mut device) = tokio::io::duplex(256);
        device.write_all(b"$GPVTG,,T,,M,,N,,K\r\n").await.unwrap();
        drop(device);

        let mut stream = PreambleStream::new(client);
        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();

        let mut expected = PREAMBLE.to_vec();
        expected.extend_from_slice(b"$GPVTG,,T,,M,,N,,K\r\n");
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn test_preamble_across_small_reads() {
        let (client, device) = tokio::io::duplex(64);
        drop(device);

        let mut stream = PreambleStream::new(client);
        let mut out = Vec::new();
        let mut chunk = [0u8; 7];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        assert_eq!(out, PREAMBLE);
        assert!(stream.preamble_consumed());
    }

    #[tokio::test]
    async fn test_writes_pass_through() {
        let (client, mut device) = tokio::io::duplex(64);
        let mut stream = PreambleStream::new(client);
        stream.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();

        let mut buf = [0u8; 18];
        device.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"GET / HTTP/1.1\r\n\r\n");
        assert!(!stream.preamble_consumed());
    }
}
