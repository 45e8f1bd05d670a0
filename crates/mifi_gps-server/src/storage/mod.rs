// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Durable storage for sampled fixes.
//!
//! The flusher only talks to the [`RecordStore`] and [`StoreTransaction`]
//! traits; [`PostgresStore`] is the production backend.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::PersistenceRecord;

mod postgres;

pub use self::postgres::{LoggedFix, PostgresStore};

/// A store that can append records inside a transaction.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Open a new transaction.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StorageError>;
}

/// An open storage transaction.
///
/// Dropping a transaction without committing discards every insert made
/// through it.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Append one record.
    async fn insert(&mut self, record: &PersistenceRecord) -> Result<(), StorageError>;

    /// Make every insert durable.
    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    /// Discard every insert.
    async fn rollback(self: Box<Self>) -> Result<(), StorageError>;
}
