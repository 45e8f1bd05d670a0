// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! PostgreSQL + PostGIS backend.
//!
//! Expects the `gps_logs` table from `schema.sql`. Queries are built at
//! runtime, so no database is needed to compile the crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};

use super::{RecordStore, StoreTransaction};
use crate::error::StorageError;
use crate::record::PersistenceRecord;

const INSERT_SQL: &str = "INSERT INTO gps_logs(logged_at, gps_timestamp, gps_geometry, gps_speed, gps_course) \
     VALUES($1, $2, ST_GeographyFromText($3), $4, $5)";

const LATEST_SQL: &str = "SELECT logged_at, gps_timestamp, \
     ST_X(gps_geometry::geometry), ST_Y(gps_geometry::geometry), ST_Z(gps_geometry::geometry) \
     FROM gps_logs ORDER BY logged_at DESC LIMIT 1";

/// Most recently logged row, as read back from the database.
#[derive(Clone, Debug, PartialEq)]
pub struct LoggedFix {
    /// Capture time of the sample.
    pub logged_at: DateTime<Utc>,
    /// Time reported by the receiver.
    pub gps_timestamp: DateTime<Utc>,
    /// Longitude.
    pub x: f64,
    /// Latitude.
    pub y: f64,
    /// Altitude, if the stored point has one.
    pub z: Option<f64>,
}

/// Record store backed by a PostgreSQL connection pool.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a store whose connections are opened on first use.
    ///
    /// Only the connection string is validated here; an unreachable database
    /// surfaces later as flush errors.
    pub fn connect_lazy(url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new().max_connections(2).connect_lazy(url)?;
        Ok(Self { pool })
    }

    /// Read the most recently logged row, if any.
    pub async fn latest(&self) -> Result<Option<LoggedFix>, StorageError> {
        let row: Option<(DateTime<Utc>, DateTime<Utc>, f64, f64, Option<f64>)> =
            sqlx::query_as(LATEST_SQL)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(logged_at, gps_timestamp, x, y, z)| LoggedFix {
            logged_at,
            gps_timestamp,
            x,
            y,
            z,
        }))
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StorageError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PostgresTransaction {
    async fn insert(&mut self, record: &PersistenceRecord) -> Result<(), StorageError> {
        sqlx::query(INSERT_SQL)
            .bind(record.captured_at)
            .bind(record.device_time)
            .bind(record.point.to_ewkt())
            .bind(record.speed)
            .bind(record.course)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let this = *self;
        this.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        let this = *self;
        this.tx.rollback().await?;
        Ok(())
    }
}
