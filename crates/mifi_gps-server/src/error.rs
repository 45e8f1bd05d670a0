// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for the GPS logging service.
//!
//! Each background task has its own error type. None of them is fatal: the
//! task that produced it logs it and carries on with its next cycle. Only
//! [`ConfigError`] (and the top-level [`Error`] wrapping it) stops the process.

use std::io;

use mifi_gps_proto::fragment::{NmeaDate, NmeaTime};
use thiserror::Error;

/// Failures of the device telemetry stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// TCP connection to the device could not be established.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        /// Device address that was dialed.
        addr: String,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },
    /// Writing the stream request failed.
    #[error("failed to send stream request: {0}")]
    Request(#[source] io::Error),
    /// The response head was not a successful HTTP status line.
    #[error("unexpected response status line: {status_line:?}")]
    BadStatus {
        /// The status line as received.
        status_line: String,
    },
    /// Reading from the stream failed.
    #[error("failed to read from stream: {0}")]
    Read(#[source] io::Error),
    /// The device sent a line longer than the reader accepts.
    #[error("line exceeds {limit} bytes without a newline")]
    LineTooLong {
        /// Maximum accepted line length.
        limit: usize,
    },
    /// The device closed the connection.
    #[error("reached end of stream from device")]
    EndOfStream,
}

/// Reasons a sampling cycle produced no record.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SampleError {
    /// The store lacks an RMC or a GGA fragment. Expected while the device
    /// is disconnected or has no fix.
    #[error("no data to log")]
    NoDataToLog,
    /// RMC date and time did not combine into a valid UTC timestamp.
    #[error("failed to combine RMC date {date:?} and time {time:?} into a timestamp")]
    Timestamp {
        /// Date field of the RMC fragment.
        date: Option<NmeaDate>,
        /// Time field of the RMC fragment.
        time: Option<NmeaTime>,
    },
    /// A coordinate needed for the 3D point was empty.
    #[error("fix is missing {field}")]
    MissingPosition {
        /// Name of the missing coordinate.
        field: &'static str,
    },
}

/// Durable storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error reported by the database driver.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Storage refused or could not perform the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A flush cycle that did not commit. The batch stays queued.
#[derive(Debug, Error)]
pub enum FlushError {
    /// The transaction could not be opened.
    #[error("failed to start db transaction: {0}")]
    Begin(#[source] StorageError),
    /// Inserting one record of the batch failed.
    #[error("failed to insert record {index} of batch: {source}")]
    Insert {
        /// Zero-based position of the failing record within the batch.
        index: usize,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },
    /// The commit itself failed.
    #[error("failed to commit db transaction: {0}")]
    Commit(#[source] StorageError),
}

/// Status page rendering failures.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing into the output buffer failed.
    #[error("formatting failed")]
    Format(#[from] std::fmt::Error),
    /// The template could not produce a page.
    #[error("template error: {0}")]
    Template(String),
}

/// Startup configuration errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("missing required setting {var}")]
    Missing {
        /// Name of the environment variable.
        var: &'static str,
    },
    /// A setting has an unusable value.
    #[error("invalid value for {var}: {detail}")]
    Invalid {
        /// Name of the environment variable.
        var: &'static str,
        /// Why the value was rejected.
        detail: String,
    },
}

/// Fatal errors that stop the service binaries.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid startup configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Storage could not be set up.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A listening socket could not be bound.
    #[error("failed to bind status endpoint on {addr}: {source}")]
    Bind {
        /// Address that could not be bound.
        addr: String,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_flush_error_keeps_source() {
        let err = FlushError::Insert {
            index: 2,
            source: StorageError::Unavailable("disk full".into()),
        };
        assert_eq!(
            err.to_string(),
            "failed to insert record 2 of batch: storage unavailable: disk full"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_config_error_message() {
        let err = ConfigError::Missing {
            var: "MIFI_GPS_DBCONNSTR",
        };
        assert_eq!(err.to_string(), "missing required setting MIFI_GPS_DBCONNSTR");
    }
}
