// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One decoded sentence of device telemetry.
///
/// The variant set is closed: the parser reports every other sentence type as
/// [`NmeaError::UnsupportedSentence`](crate::error::NmeaError::UnsupportedSentence).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum FixFragment {
    /// Recommended minimum position/velocity data.
    Rmc(Rmc),
    /// Fix data including altitude.
    Gga(Gga),
    /// DOP and active satellites.
    Gsa(Gsa),
    /// Satellites in view.
    Gsv(Gsv),
    /// Track made good and ground speed.
    Vtg(Vtg),
}

impl FixFragment {
    /// The three-letter NMEA sentence type of this fragment.
    pub fn kind(&self) -> &'static str {
        match self {
            FixFragment::Rmc(_) => "RMC",
            FixFragment::Gga(_) => "GGA",
            FixFragment::Gsa(_) => "GSA",
            FixFragment::Gsv(_) => "GSV",
            FixFragment::Vtg(_) => "VTG",
        }
    }
}

/// UTC time of day as reported by the receiver (`hhmmss.sss`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NmeaTime {
    /// Hour (0-23).
    pub hour: u8,
    /// Minute (0-59).
    pub minute: u8,
    /// Second (0-60, 60 during a leap second).
    pub second: u8,
    /// Millisecond part of the fractional seconds.
    pub millisecond: u16,
}

impl fmt::Display for NmeaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hour, self.minute, self.second, self.millisecond
        )
    }
}

/// UTC date as reported by the receiver (`ddmmyy`).
///
/// Only the two-digit year is transmitted; the century is resolved when the
/// date is combined with a time of day. No calendar validation happens at
/// decode time, so a receiver may report e.g. day 00 before it has a fix.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NmeaDate {
    /// Day of month.
    pub day: u8,
    /// Month of year.
    pub month: u8,
    /// Two-digit year.
    pub year: u8,
}

impl NmeaDate {
    /// Four-digit year, with 69-99 mapped to 19xx and 00-68 to 20xx.
    pub fn full_year(&self) -> i32 {
        if self.year >= 69 {
            1900 + self.year as i32
        } else {
            2000 + self.year as i32
        }
    }
}

impl fmt::Display for NmeaDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:02}", self.day, self.month, self.year)
    }
}

/// GPS fix quality (GGA field 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum FixQuality {
    /// No fix available
    NoFix = 0,
    /// GPS fix
    Gps = 1,
    /// Differential GPS fix
    DGps = 2,
    /// PPS fix
    Pps = 3,
    /// Real-time kinematic
    Rtk = 4,
    /// Float RTK
    FloatRtk = 5,
    /// Estimated/Dead reckoning
    Estimated = 6,
    /// Manual input
    Manual = 7,
    /// Simulation
    Simulation = 8,
}

impl FixQuality {
    /// Convert a numeric value to FixQuality. Unknown values map to `NoFix`.
    pub fn from_u8(val: u8) -> Self {
        match val {
            1 => FixQuality::Gps,
            2 => FixQuality::DGps,
            3 => FixQuality::Pps,
            4 => FixQuality::Rtk,
            5 => FixQuality::FloatRtk,
            6 => FixQuality::Estimated,
            7 => FixQuality::Manual,
            8 => FixQuality::Simulation,
            _ => FixQuality::NoFix,
        }
    }

    /// Whether this quality denotes a usable position.
    pub fn has_fix(&self) -> bool {
        !matches!(self, FixQuality::NoFix | FixQuality::Simulation)
    }
}

impl fmt::Display for FixQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FixQuality::NoFix => "no fix",
            FixQuality::Gps => "GPS",
            FixQuality::DGps => "DGPS",
            FixQuality::Pps => "PPS",
            FixQuality::Rtk => "RTK",
            FixQuality::FloatRtk => "float RTK",
            FixQuality::Estimated => "estimated",
            FixQuality::Manual => "manual",
            FixQuality::Simulation => "simulation",
        };
        f.write_str(s)
    }
}

/// GSA fix type (field 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum FixType {
    /// Fix not available.
    NoFix,
    /// 2D fix.
    Fix2D,
    /// 3D fix.
    Fix3D,
}

/// GSA selection mode (field 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SelectionMode {
    /// Forced to operate in 2D or 3D.
    Manual,
    /// Automatic 2D/3D switching.
    Automatic,
}

/// RMC: recommended minimum position, velocity and date/time.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Rmc {
    /// UTC time of the fix.
    pub time: Option<NmeaTime>,
    /// `true` when the status field is `A` (data valid).
    pub valid: bool,
    /// Latitude in decimal degrees, positive north.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, positive east.
    pub longitude: Option<f64>,
    /// Speed over ground in knots.
    pub speed: Option<f64>,
    /// Course over ground in degrees true.
    pub course: Option<f64>,
    /// UTC date of the fix.
    pub date: Option<NmeaDate>,
    /// Magnetic variation in degrees, positive east.
    pub variation: Option<f64>,
}

/// GGA: fix data including altitude and quality.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Gga {
    /// UTC time of the fix.
    pub time: Option<NmeaTime>,
    /// Latitude in decimal degrees, positive north.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, positive east.
    pub longitude: Option<f64>,
    /// Fix quality indicator.
    pub quality: FixQuality,
    /// Number of satellites in use.
    pub satellites: Option<u8>,
    /// Horizontal dilution of precision.
    pub hdop: Option<f64>,
    /// Altitude above mean sea level in meters.
    pub altitude: Option<f64>,
    /// Geoid separation in meters.
    pub separation: Option<f64>,
}

/// GSA: DOP figures and the satellites used in the fix.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Gsa {
    /// Manual or automatic 2D/3D mode.
    pub mode: SelectionMode,
    /// Fix dimension.
    pub fix_type: FixType,
    /// PRNs of satellites used in the solution (up to 12).
    pub satellites: Vec<u16>,
    /// Position dilution of precision.
    pub pdop: Option<f64>,
    /// Horizontal dilution of precision.
    pub hdop: Option<f64>,
    /// Vertical dilution of precision.
    pub vdop: Option<f64>,
}

/// Signal data for one satellite in a GSV sentence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SatelliteInfo {
    /// Satellite PRN number.
    pub prn: u16,
    /// Elevation in degrees (0-90).
    pub elevation: Option<u8>,
    /// Azimuth in degrees true (0-359).
    pub azimuth: Option<u16>,
    /// Signal-to-noise ratio in dB-Hz, absent when not tracking.
    pub snr: Option<u8>,
}

/// GSV: one message of the satellites-in-view sequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Gsv {
    /// Total number of GSV messages in this cycle.
    pub total_messages: u8,
    /// Number of this message (1-based).
    pub message_number: u8,
    /// Total satellites in view.
    pub satellites_in_view: u8,
    /// Up to four satellites described by this message.
    pub satellites: Vec<SatelliteInfo>,
}

/// VTG: track made good and ground speed.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Vtg {
    /// Course over ground in degrees true.
    pub true_track: Option<f64>,
    /// Course over ground in degrees magnetic.
    pub magnetic_track: Option<f64>,
    /// Ground speed in knots.
    pub ground_speed_knots: Option<f64>,
    /// Ground speed in km/h.
    pub ground_speed_kph: Option<f64>,
}
