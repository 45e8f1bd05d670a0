// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! NMEA 0183 sentence types and parser for the MiFi GPS logger.
//!
//! This crate provides the pure decoding layer: one line of device telemetry
//! goes in, one typed [`FixFragment`](fragment::FixFragment) comes out. It
//! performs no I/O and holds no state, so it can be used by the streaming
//! service as well as by offline tools.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `serde` | no | `Serialize` implementations for all fragment types. |
//!
//! # Examples
//!
//! ```
//! use mifi_gps_proto::fragment::FixFragment;
//! use mifi_gps_proto::nmea::parse_sentence;
//!
//! let line = "$GPGGA,123519.000,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*59";
//! match parse_sentence(line).unwrap() {
//!     FixFragment::Gga(gga) => assert_eq!(gga.satellites, Some(8)),
//!     other => panic!("unexpected fragment: {other:?}"),
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Errors produced while decoding NMEA sentences.
pub mod error;

/// Coordinate formatting helpers for display.
pub mod format;

/// The five decoded fragment types and their field types.
pub mod fragment;

/// NMEA 0183 sentence parser.
pub mod nmea;

pub use error::NmeaError;
pub use fragment::FixFragment;
pub use nmea::parse_sentence;
