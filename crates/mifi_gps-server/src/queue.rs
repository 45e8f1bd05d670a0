// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Bounded buffer of records waiting to be written to storage.
//!
//! The sampler is the only writer and the flusher the only consumer. The
//! flusher works on a copy of the pending batch and acknowledges it by
//! sequence number once committed, so the queue lock is never held while
//! talking to the database.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::record::PersistenceRecord;

/// Default number of records retained while storage is unreachable.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// A record tagged with its enqueue sequence number.
#[derive(Clone, Debug, PartialEq)]
pub struct QueuedRecord {
    /// Monotonically increasing, starting at 0.
    pub seq: u64,
    /// The queued record.
    pub record: PersistenceRecord,
}

#[derive(Debug, Default)]
struct QueueInner {
    records: VecDeque<QueuedRecord>,
    next_seq: u64,
}

/// FIFO of pending [`PersistenceRecord`]s that drops its oldest entries
/// beyond a fixed capacity.
#[derive(Debug)]
pub struct OutboundQueue {
    capacity: usize,
    inner: Mutex<QueueInner>,
}

impl Default for OutboundQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

impl OutboundQueue {
    /// Create an empty queue retaining at most `capacity` records (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(QueueInner {
                records: VecDeque::with_capacity(capacity),
                next_seq: 0,
            }),
        }
    }

    /// Maximum number of retained records.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a record, evicting the oldest ones beyond capacity.
    ///
    /// Returns the number of records evicted.
    pub fn enqueue(&self, record: PersistenceRecord) -> usize {
        let mut inner = self.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.records.push_back(QueuedRecord { seq, record });

        let excess = inner.records.len().saturating_sub(self.capacity);
        inner.records.drain(..excess);
        excess
    }

    /// Copy of every pending record, oldest first.
    pub fn pending(&self) -> Vec<QueuedRecord> {
        self.lock().records.iter().cloned().collect()
    }

    /// Remove every record with a sequence number up to and including
    /// `through`. Returns how many were removed.
    ///
    /// Records enqueued after the batch was taken have higher sequence
    /// numbers and are kept; records evicted in the meantime are simply gone.
    pub fn acknowledge(&self, through: u64) -> usize {
        let mut inner = self.lock();
        let flushed = inner
            .records
            .iter()
            .take_while(|q| q.seq <= through)
            .count();
        inner.records.drain(..flushed);
        flushed
    }

    /// Number of pending records.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PointZ;
    use chrono::{TimeZone, Utc};

    fn record(n: i64) -> PersistenceRecord {
        let t = Utc.timestamp_opt(1_700_000_000 + n, 0).unwrap();
        PersistenceRecord {
            captured_at: t,
            device_time: t,
            point: PointZ {
                longitude: n as f64,
                latitude: 0.0,
                altitude: 0.0,
            },
            speed: None,
            course: None,
        }
    }

    fn longitudes(queue: &OutboundQueue) -> Vec<i64> {
        queue
            .pending()
            .iter()
            .map(|q| q.record.point.longitude as i64)
            .collect()
    }

    #[test]
    fn test_enqueue_below_capacity_keeps_everything() {
        let queue = OutboundQueue::with_capacity(100);
        for n in 0..5 {
            assert_eq!(queue.enqueue(record(n)), 0);
        }
        assert_eq!(longitudes(&queue), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_enqueue_beyond_capacity_drops_oldest() {
        let queue = OutboundQueue::with_capacity(100);
        for n in 0..150 {
            queue.enqueue(record(n));
            assert!(queue.len() <= 100);
        }
        assert_eq!(longitudes(&queue), (50..150).collect::<Vec<_>>());
    }

    #[test]
    fn test_acknowledge_keeps_newer_records() {
        let queue = OutboundQueue::with_capacity(10);
        for n in 0..3 {
            queue.enqueue(record(n));
        }
        let batch = queue.pending();
        queue.enqueue(record(3));

        assert_eq!(queue.acknowledge(batch.last().unwrap().seq), 3);
        assert_eq!(longitudes(&queue), vec![3]);
    }

    #[test]
    fn test_acknowledge_after_eviction() {
        let queue = OutboundQueue::with_capacity(3);
        for n in 0..3 {
            queue.enqueue(record(n));
        }
        let batch = queue.pending();
        // Two more arrive while the batch is in flight, evicting 0 and 1.
        queue.enqueue(record(3));
        queue.enqueue(record(4));

        assert_eq!(queue.acknowledge(batch.last().unwrap().seq), 1);
        assert_eq!(longitudes(&queue), vec![3, 4]);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let queue = OutboundQueue::with_capacity(0);
        assert_eq!(queue.capacity(), 1);
        queue.enqueue(record(1));
        queue.enqueue(record(2));
        assert_eq!(longitudes(&queue), vec![2]);
    }
}
