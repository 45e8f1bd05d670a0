// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/// Which axis a coordinate lies on, used to pick the hemisphere letter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    /// North/south.
    Latitude,
    /// East/west.
    Longitude,
}

/// Hemisphere letter for a signed decimal-degree coordinate.
pub fn hemisphere(value: f64, axis: Axis) -> char {
    match (axis, value.is_sign_negative()) {
        (Axis::Latitude, false) => 'N',
        (Axis::Latitude, true) => 'S',
        (Axis::Longitude, false) => 'E',
        (Axis::Longitude, true) => 'W',
    }
}

/// Format decimal degrees in NMEA `DDMM.MMMM` notation (unsigned).
///
/// ```
/// use mifi_gps_proto::format::format_gps;
/// assert_eq!(format_gps(48.1173), "4807.0380");
/// assert_eq!(format_gps(-11.5), "1130.0000");
/// ```
pub fn format_gps(value: f64) -> String {
    // Round once, in units of the last printed digit, so that the minutes
    // can never show as 60.
    const UNITS_PER_MINUTE: u64 = 10_000;
    const UNITS_PER_DEGREE: u64 = 60 * UNITS_PER_MINUTE;

    let units = (value.abs() * UNITS_PER_DEGREE as f64).round() as u64;
    let degrees = units / UNITS_PER_DEGREE;
    let minutes = (units % UNITS_PER_DEGREE) as f64 / UNITS_PER_MINUTE as f64;
    format!("{degrees}{minutes:07.4}")
}

/// Format decimal degrees as degrees, minutes and seconds (unsigned).
///
/// ```
/// use mifi_gps_proto::format::format_dms;
/// assert_eq!(format_dms(48.1173), "48° 7' 2.2800\"");
/// ```
pub fn format_dms(value: f64) -> String {
    const UNITS_PER_SECOND: u64 = 10_000;
    const UNITS_PER_MINUTE: u64 = 60 * UNITS_PER_SECOND;
    const UNITS_PER_DEGREE: u64 = 60 * UNITS_PER_MINUTE;

    let units = (value.abs() * UNITS_PER_DEGREE as f64).round() as u64;
    let degrees = units / UNITS_PER_DEGREE;
    let minutes = units % UNITS_PER_DEGREE / UNITS_PER_MINUTE;
    let seconds = (units % UNITS_PER_MINUTE) as f64 / UNITS_PER_SECOND as f64;
    format!("{degrees}° {minutes}' {seconds:.4}\"")
}
