// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Periodic, all-or-nothing drain of the outbound queue into storage.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::FlushError;
use crate::queue::OutboundQueue;
use crate::schedule::periodic;
use crate::storage::RecordStore;

/// Writes every queued record to storage in one transaction per cycle.
///
/// Records leave the queue only after their transaction committed. A failed
/// cycle leaves the whole batch queued, in order, for the next one.
#[derive(Clone)]
pub struct Flusher {
    storage: Arc<dyn RecordStore>,
    queue: Arc<OutboundQueue>,
    period: Duration,
}

impl Flusher {
    /// Create a flusher with a 5 minute period.
    pub fn new(storage: Arc<dyn RecordStore>, queue: Arc<OutboundQueue>) -> Self {
        Self {
            storage,
            queue,
            period: Duration::from_secs(5 * 60),
        }
    }

    /// Set the interval between cycles.
    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Run one flush cycle. Returns the number of records committed.
    pub async fn flush_once(&self) -> Result<usize, FlushError> {
        let batch = self.queue.pending();
        let Some(last) = batch.last() else {
            return Ok(0);
        };
        let through = last.seq;
        info!(queued = batch.len(), "pushing GPS data");

        let mut tx = self.storage.begin().await.map_err(FlushError::Begin)?;
        for (index, queued) in batch.iter().enumerate() {
            if let Err(source) = tx.insert(&queued.record).await {
                if let Err(e) = tx.rollback().await {
                    debug!(error = %e, "rollback after failed insert also failed");
                }
                return Err(FlushError::Insert { index, source });
            }
        }
        tx.commit().await.map_err(FlushError::Commit)?;

        self.queue.acknowledge(through);
        Ok(batch.len())
    }

    /// Run flush cycles forever, starting immediately.
    pub async fn run(self) {
        let mut ticker = periodic(Duration::ZERO, self.period);
        loop {
            ticker.tick().await;
            match self.flush_once().await {
                Ok(0) => debug!("nothing to push"),
                Ok(n) => info!(records = n, "pushed GPS data"),
                Err(e) => warn!(
                    error = %e,
                    retained = self.queue.len(),
                    "error pushing GPS data"
                ),
            }
        }
    }
}

impl std::fmt::Debug for Flusher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flusher")
            .field("queue", &self.queue)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}
