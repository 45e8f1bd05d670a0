// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use mifi_gps_proto::fragment::{NmeaDate, NmeaTime};

use crate::error::SampleError;

/// A 3D WGS 84 position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointZ {
    /// Decimal degrees, positive east.
    pub longitude: f64,
    /// Decimal degrees, positive north.
    pub latitude: f64,
    /// Meters above mean sea level.
    pub altitude: f64,
}

impl PointZ {
    /// Extended WKT form accepted by `ST_GeographyFromText`.
    pub fn to_ewkt(&self) -> String {
        format!(
            "SRID=4326;POINTZ({:.6} {:.6} {:.6})",
            self.longitude, self.latitude, self.altitude
        )
    }
}

/// One sampled fix, ready to be written to storage. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct PersistenceRecord {
    /// Wall-clock time the sample was taken.
    pub captured_at: DateTime<Utc>,
    /// Time reported by the receiver.
    pub device_time: DateTime<Utc>,
    /// Position of the fix.
    pub point: PointZ,
    /// Speed over ground in knots.
    pub speed: Option<f64>,
    /// Course over ground in degrees true.
    pub course: Option<f64>,
}

/// Combine an RMC date and time of day into a UTC timestamp.
pub fn device_timestamp(
    date: Option<NmeaDate>,
    time: Option<NmeaTime>,
) -> Result<DateTime<Utc>, SampleError> {
    let invalid = || SampleError::Timestamp { date, time };
    let (d, t) = date.zip(time).ok_or_else(invalid)?;

    let day = NaiveDate::from_ymd_opt(d.full_year(), d.month as u32, d.day as u32)
        .ok_or_else(invalid)?;
    let time_of_day = NaiveTime::from_hms_milli_opt(
        t.hour as u32,
        t.minute as u32,
        t.second as u32,
        t.millisecond as u32,
    )
    .ok_or_else(invalid)?;

    Ok(Utc.from_utc_datetime(&day.and_time(time_of_day)))
}
