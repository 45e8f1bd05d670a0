// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Periodic sampling of the fix store into the outbound queue.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::SampleError;
use crate::fix_store::{FixSnapshot, FixStore};
use crate::queue::OutboundQueue;
use crate::record::{PersistenceRecord, PointZ, device_timestamp};
use crate::schedule::periodic;

/// Derive a [`PersistenceRecord`] from a snapshot.
///
/// Needs both an RMC (position, speed, course, date/time) and a GGA
/// (altitude) fragment. Latitude and longitude come from the RMC.
pub fn build_record(
    snapshot: &FixSnapshot,
    captured_at: DateTime<Utc>,
) -> Result<PersistenceRecord, SampleError> {
    let (Some(rmc), Some(gga)) = (&snapshot.rmc, &snapshot.gga) else {
        return Err(SampleError::NoDataToLog);
    };

    let device_time = device_timestamp(rmc.date, rmc.time)?;

    let missing = |field| SampleError::MissingPosition { field };
    let point = PointZ {
        longitude: rmc.longitude.ok_or_else(|| missing("longitude"))?,
        latitude: rmc.latitude.ok_or_else(|| missing("latitude"))?,
        altitude: gga.altitude.ok_or_else(|| missing("altitude"))?,
    };

    Ok(PersistenceRecord {
        captured_at,
        device_time,
        point,
        speed: rmc.speed,
        course: rmc.course,
    })
}

/// Takes a snapshot of the fix store on a fixed schedule and queues a
/// record when the snapshot is complete enough.
#[derive(Clone, Debug)]
pub struct Sampler {
    store: Arc<FixStore>,
    queue: Arc<OutboundQueue>,
    initial_delay: Duration,
    period: Duration,
}

impl Sampler {
    /// Create a sampler with a 10 second startup delay and a 15 minute period.
    pub fn new(store: Arc<FixStore>, queue: Arc<OutboundQueue>) -> Self {
        Self {
            store,
            queue,
            initial_delay: Duration::from_secs(10),
            period: Duration::from_secs(15 * 60),
        }
    }

    /// Set the delay before the first cycle.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the interval between cycles.
    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Run one sampling cycle.
    ///
    /// The fix store lock is released before the queue lock is taken.
    pub fn sample_once(&self) -> Result<(), SampleError> {
        let snapshot = self.store.snapshot();
        let record = build_record(&snapshot, Utc::now())?;
        info!(device_time = %record.device_time, "queuing location");

        let evicted = self.queue.enqueue(record);
        if evicted > 0 {
            warn!(
                evicted,
                capacity = self.queue.capacity(),
                "outbound queue full, dropped oldest records"
            );
        }
        Ok(())
    }

    /// Run sampling cycles forever.
    pub async fn run(self) {
        let mut ticker = periodic(self.initial_delay, self.period);
        loop {
            ticker.tick().await;
            match self.sample_once() {
                Ok(()) => {}
                Err(SampleError::NoDataToLog) => debug!("skipped queuing, no data"),
                Err(e) => warn!(error = %e, "error queuing location"),
            }
        }
    }
}
