// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Lock-free stream reader counters.
//!
//! All counters use relaxed ordering; values read concurrently with the
//! reader are approximate.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Runtime counters for the [`StreamReader`](super::StreamReader).
#[derive(Debug, Default)]
pub struct ReaderMetrics {
    /// Connection attempts made to the device.
    pub connect_attempts: AtomicU64,
    /// Streams that ended in an error (connect, read, or end of stream).
    pub stream_failures: AtomicU64,
    /// Non-empty lines received after framing.
    pub lines_received: AtomicU64,
    /// Lines decoded into a fragment and stored.
    pub fragments_decoded: AtomicU64,
    /// Lines that failed to decode or were of an unsupported type.
    pub decode_errors: AtomicU64,
    /// Times the fix store was cleared.
    pub store_clears: AtomicU64,
}

impl ReaderMetrics {
    /// Create a new metrics instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> ReaderMetricsSnapshot {
        ReaderMetricsSnapshot {
            connect_attempts: self.connect_attempts.load(Ordering::Relaxed),
            stream_failures: self.stream_failures.load(Ordering::Relaxed),
            lines_received: self.lines_received.load(Ordering::Relaxed),
            fragments_decoded: self.fragments_decoded.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            store_clears: self.store_clears.load(Ordering::Relaxed),
        }
    }

    #[inline]
    pub(crate) fn inc_connect_attempts(&self) {
        self.connect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_stream_failures(&self) {
        self.stream_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_lines_received(&self) {
        self.lines_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_fragments_decoded(&self) {
        self.fragments_decoded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_decode_errors(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_store_clears(&self) {
        self.store_clears.fetch_add(1, Ordering::Relaxed);
    }
}

/// A point-in-time snapshot of reader counters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ReaderMetricsSnapshot {
    /// Connection attempts made to the device.
    pub connect_attempts: u64,
    /// Streams that ended in an error.
    pub stream_failures: u64,
    /// Non-empty lines received.
    pub lines_received: u64,
    /// Lines decoded and stored.
    pub fragments_decoded: u64,
    /// Lines that failed to decode.
    pub decode_errors: u64,
    /// Times the fix store was cleared.
    pub store_clears: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_increment() {
        let m = ReaderMetrics::new();
        assert_eq!(m.snapshot(), ReaderMetricsSnapshot::default());

        m.inc_connect_attempts();
        m.inc_connect_attempts();
        m.inc_lines_received();
        m.inc_decode_errors();
        m.inc_store_clears();
        let s = m.snapshot();
        assert_eq!(s.connect_attempts, 2);
        assert_eq!(s.lines_received, 1);
        assert_eq!(s.decode_errors, 1);
        assert_eq!(s.store_clears, 1);
        assert_eq!(s.fragments_decoded, 0);
    }
}
