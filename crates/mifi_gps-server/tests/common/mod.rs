// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared test helpers for server integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use mifi_gps_server::error::StorageError;
use mifi_gps_server::record::{PersistenceRecord, PointZ};
use mifi_gps_server::storage::{RecordStore, StoreTransaction};

#[derive(Debug, Default)]
pub(crate) struct MockState {
    /// Records made durable, in commit order.
    pub committed: Vec<PersistenceRecord>,
    /// Number of transactions opened.
    pub begins: usize,
    /// Number of transactions rolled back.
    pub rollbacks: usize,
    /// Fail the Nth insert (1-based) of every transaction.
    pub fail_on_insert: Option<usize>,
    /// Refuse to open transactions.
    pub fail_begin: bool,
}

/// In-memory [`RecordStore`] with injectable failures.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockStore {
    pub state: Arc<Mutex<MockState>>,
}

impl MockStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_on_insert(n: usize) -> Self {
        let store = Self::new();
        store.state.lock().unwrap().fail_on_insert = Some(n);
        store
    }

    pub(crate) fn heal(&self) {
        let mut state = self.state.lock().unwrap();
        state.fail_on_insert = None;
        state.fail_begin = false;
    }

    pub(crate) fn committed(&self) -> Vec<PersistenceRecord> {
        self.state.lock().unwrap().committed.clone()
    }

    pub(crate) fn begins(&self) -> usize {
        self.state.lock().unwrap().begins
    }

    pub(crate) fn rollbacks(&self) -> usize {
        self.state.lock().unwrap().rollbacks
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StorageError> {
        let mut state = self.state.lock().unwrap();
        state.begins += 1;
        if state.fail_begin {
            return Err(StorageError::Unavailable("connection refused".into()));
        }
        Ok(Box::new(MockTransaction {
            state: Arc::clone(&self.state),
            fail_on_insert: state.fail_on_insert,
            staged: Vec::new(),
        }))
    }
}

struct MockTransaction {
    state: Arc<Mutex<MockState>>,
    fail_on_insert: Option<usize>,
    staged: Vec<PersistenceRecord>,
}

#[async_trait]
impl StoreTransaction for MockTransaction {
    async fn insert(&mut self, record: &PersistenceRecord) -> Result<(), StorageError> {
        if self.fail_on_insert == Some(self.staged.len() + 1) {
            return Err(StorageError::Unavailable("insert failed".into()));
        }
        self.staged.push(record.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let this = *self;
        this.state.lock().unwrap().committed.extend(this.staged);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        self.state.lock().unwrap().rollbacks += 1;
        Ok(())
    }
}

/// A distinguishable record: `n` minutes after a fixed epoch.
pub(crate) fn record(n: i64) -> PersistenceRecord {
    let base: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
    PersistenceRecord {
        captured_at: base + Duration::minutes(n),
        device_time: base + Duration::minutes(n),
        point: PointZ {
            longitude: 11.5 + n as f64 * 0.001,
            latitude: 48.1,
            altitude: 545.4,
        },
        speed: Some(0.0),
        course: None,
    }
}
