// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! GPS logging service for MiFi hotspots.
//!
//! The hotspot exposes its GPS receiver as a never-ending NMEA 0183 text
//! stream over TCP. This crate keeps the latest decoded fix in memory,
//! samples it on a schedule into a bounded outbound queue, flushes that
//! queue transactionally to PostgreSQL/PostGIS, and serves a small status
//! page.
//!
//! # Tasks
//!
//! | Task | Module | Schedule |
//! |------|--------|----------|
//! | Stream reader | [`stream`] | continuous, 60 s cooldown after a failure |
//! | Sampler | [`sampler`] | 10 s after start, then every 15 min |
//! | Flusher | [`flusher`] | at start, then every 5 min |
//! | Status page | [`status`] | per request |
//!
//! The tasks share exactly two pieces of state, the [`fix_store::FixStore`]
//! and the [`queue::OutboundQueue`]. [`service::GpsLogger`] creates both and
//! runs the tasks.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fix_store;
pub mod flusher;
pub mod queue;
/// Records persisted per sample.
pub mod record;
pub mod sampler;
pub mod service;
pub mod status;
pub mod storage;
pub mod stream;

mod schedule;

pub use mifi_gps_proto as proto;
