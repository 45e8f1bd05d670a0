// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

// NMEA 0183 sentence parser for the hotspot's GPS receiver
//
// Decodes the five sentence types the device emits every second:
// - $xxRMC - Recommended Minimum Specific GNSS Data
// - $xxGGA - Global Positioning System Fix Data
// - $xxGSA - GNSS DOP and Active Satellites
// - $xxGSV - GNSS Satellites in View
// - $xxVTG - Course Over Ground and Ground Speed
//
// The talker prefix (GP, GN, GL, ...) is accepted but not interpreted.

use crate::error::NmeaError;
use crate::fragment::{
    FixFragment, FixQuality, FixType, Gga, Gsa, Gsv, NmeaDate, NmeaTime, Rmc, SatelliteInfo,
    SelectionMode, Vtg,
};

/// Decode one NMEA sentence into a [`FixFragment`].
///
/// Surrounding whitespace is ignored. The `*HH` checksum is mandatory.
///
/// # Errors
///
/// Returns [`NmeaError::UnsupportedSentence`] for well-formed sentences of
/// other types, and one of the other variants when the line is malformed.
pub fn parse_sentence(sentence: &str) -> Result<FixFragment, NmeaError> {
    let sentence = sentence.trim();

    if !sentence.is_ascii() {
        return Err(NmeaError::InvalidFormat {
            detail: "non-ASCII characters",
        });
    }
    let Some(body) = sentence.strip_prefix('$') else {
        return Err(NmeaError::InvalidFormat {
            detail: "missing '$' start delimiter",
        });
    };

    let Some((data, expected_checksum)) = body.rsplit_once('*') else {
        return Err(NmeaError::InvalidChecksum);
    };
    if expected_checksum.len() != 2 {
        return Err(NmeaError::InvalidChecksum);
    }
    let expected =
        u8::from_str_radix(expected_checksum, 16).map_err(|_| NmeaError::InvalidChecksum)?;
    let actual = calculate_checksum(data);
    if actual != expected {
        return Err(NmeaError::ChecksumMismatch { expected, actual });
    }

    let fields: Vec<&str> = data.split(',').collect();
    let address = fields[0];
    if address.len() < 5 || !address.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(NmeaError::InvalidFormat {
            detail: "malformed address field",
        });
    }
    // Proprietary sentences ($Pxxx...) carry a manufacturer code, not a talker.
    if address.starts_with('P') {
        return Err(NmeaError::UnsupportedSentence {
            kind: address.to_string(),
        });
    }

    match &address[address.len() - 3..] {
        "RMC" => parse_rmc(&fields).map(FixFragment::Rmc),
        "GGA" => parse_gga(&fields).map(FixFragment::Gga),
        "GSA" => parse_gsa(&fields).map(FixFragment::Gsa),
        "GSV" => parse_gsv(&fields).map(FixFragment::Gsv),
        "VTG" => parse_vtg(&fields).map(FixFragment::Vtg),
        other => Err(NmeaError::UnsupportedSentence {
            kind: other.to_string(),
        }),
    }
}

fn require_fields(
    fields: &[&str],
    sentence: &'static str,
    expected: usize,
) -> Result<(), NmeaError> {
    if fields.len() < expected {
        return Err(NmeaError::TooFewFields {
            sentence,
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

fn parse_rmc(fields: &[&str]) -> Result<Rmc, NmeaError> {
    require_fields(fields, "RMC", 10)?;

    let variation = optional_f64(fields.get(10).copied().unwrap_or(""), "RMC", "variation")?;
    let variation = match fields.get(11).copied() {
        Some("W") => variation.map(|v| -v),
        _ => variation,
    };

    Ok(Rmc {
        time: parse_time(fields[1], "RMC")?,
        valid: fields[2] == "A",
        latitude: parse_coordinate(fields[3], fields[4], "RMC", "latitude")?,
        longitude: parse_coordinate(fields[5], fields[6], "RMC", "longitude")?,
        speed: optional_f64(fields[7], "RMC", "speed")?,
        course: optional_f64(fields[8], "RMC", "course")?,
        date: parse_date(fields[9], "RMC")?,
        variation,
    })
}

fn parse_gga(fields: &[&str]) -> Result<Gga, NmeaError> {
    require_fields(fields, "GGA", 15)?;

    let quality = match optional_u8(fields[6], "GGA", "fix quality")? {
        Some(q) => FixQuality::from_u8(q),
        None => FixQuality::NoFix,
    };

    Ok(Gga {
        time: parse_time(fields[1], "GGA")?,
        latitude: parse_coordinate(fields[2], fields[3], "GGA", "latitude")?,
        longitude: parse_coordinate(fields[4], fields[5], "GGA", "longitude")?,
        quality,
        satellites: optional_u8(fields[7], "GGA", "satellite count")?,
        hdop: optional_f64(fields[8], "GGA", "hdop")?,
        altitude: optional_f64(fields[9], "GGA", "altitude")?,
        separation: optional_f64(fields[11], "GGA", "separation")?,
    })
}

fn parse_gsa(fields: &[&str]) -> Result<Gsa, NmeaError> {
    require_fields(fields, "GSA", 18)?;

    let mode = match fields[1] {
        "M" => SelectionMode::Manual,
        "A" => SelectionMode::Automatic,
        _ => {
            return Err(NmeaError::ParseField {
                sentence: "GSA",
                field: "selection mode",
            });
        }
    };
    let fix_type = match fields[2] {
        "1" | "" => FixType::NoFix,
        "2" => FixType::Fix2D,
        "3" => FixType::Fix3D,
        _ => {
            return Err(NmeaError::ParseField {
                sentence: "GSA",
                field: "fix type",
            });
        }
    };

    let mut satellites = Vec::with_capacity(12);
    for prn in &fields[3..15] {
        if let Some(prn) = optional_u16(prn, "GSA", "satellite PRN")? {
            satellites.push(prn);
        }
    }

    Ok(Gsa {
        mode,
        fix_type,
        satellites,
        pdop: optional_f64(fields[15], "GSA", "pdop")?,
        hdop: optional_f64(fields[16], "GSA", "hdop")?,
        vdop: optional_f64(fields[17], "GSA", "vdop")?,
    })
}

fn parse_gsv(fields: &[&str]) -> Result<Gsv, NmeaError> {
    require_fields(fields, "GSV", 4)?;

    let required_u8 = |value: &str, field| {
        optional_u8(value, "GSV", field)?.ok_or(NmeaError::ParseField {
            sentence: "GSV",
            field,
        })
    };

    // NMEA 4.10 appends a signal ID after the satellite blocks; any
    // remainder that does not fill a whole block is ignored.
    let mut satellites = Vec::with_capacity(4);
    for block in fields[4..].chunks_exact(4) {
        let Some(prn) = optional_u16(block[0], "GSV", "satellite PRN")? else {
            continue;
        };
        satellites.push(SatelliteInfo {
            prn,
            elevation: optional_u8(block[1], "GSV", "elevation")?,
            azimuth: optional_u16(block[2], "GSV", "azimuth")?,
            snr: optional_u8(block[3], "GSV", "snr")?,
        });
    }

    Ok(Gsv {
        total_messages: required_u8(fields[1], "total messages")?,
        message_number: required_u8(fields[2], "message number")?,
        satellites_in_view: required_u8(fields[3], "satellites in view")?,
        satellites,
    })
}

fn parse_vtg(fields: &[&str]) -> Result<Vtg, NmeaError> {
    require_fields(fields, "VTG", 9)?;

    Ok(Vtg {
        true_track: optional_f64(fields[1], "VTG", "true track")?,
        magnetic_track: optional_f64(fields[3], "VTG", "magnetic track")?,
        ground_speed_knots: optional_f64(fields[5], "VTG", "ground speed (knots)")?,
        ground_speed_kph: optional_f64(fields[7], "VTG", "ground speed (km/h)")?,
    })
}

fn optional_f64(
    s: &str,
    sentence: &'static str,
    field: &'static str,
) -> Result<Option<f64>, NmeaError> {
    if s.is_empty() {
        return Ok(None);
    }
    // `f64::from_str` also takes "NaN" and "inf", which no receiver sends.
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(NmeaError::ParseField { sentence, field }),
    }
}

fn optional_u8(
    s: &str,
    sentence: &'static str,
    field: &'static str,
) -> Result<Option<u8>, NmeaError> {
    if s.is_empty() {
        return Ok(None);
    }
    s.parse()
        .map(Some)
        .map_err(|_| NmeaError::ParseField { sentence, field })
}

fn optional_u16(
    s: &str,
    sentence: &'static str,
    field: &'static str,
) -> Result<Option<u16>, NmeaError> {
    if s.is_empty() {
        return Ok(None);
    }
    s.parse()
        .map(Some)
        .map_err(|_| NmeaError::ParseField { sentence, field })
}

fn two_digits(s: &str, sentence: &'static str, field: &'static str) -> Result<u8, NmeaError> {
    if s.len() != 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NmeaError::ParseField { sentence, field });
    }
    s.parse().map_err(|_| NmeaError::ParseField { sentence, field })
}

fn parse_time(s: &str, sentence: &'static str) -> Result<Option<NmeaTime>, NmeaError> {
    if s.is_empty() {
        return Ok(None);
    }
    if s.len() < 6 {
        return Err(NmeaError::ParseField {
            sentence,
            field: "time",
        });
    }

    let hour = two_digits(&s[0..2], sentence, "hour")?;
    let minute = two_digits(&s[2..4], sentence, "minute")?;
    let second = two_digits(&s[4..6], sentence, "second")?;

    let millisecond = match &s[6..] {
        "" => 0,
        frac => {
            let digits = frac.strip_prefix('.').ok_or(NmeaError::ParseField {
                sentence,
                field: "time",
            })?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(NmeaError::ParseField {
                    sentence,
                    field: "time",
                });
            }
            // Scale to exactly three digits: ".5" -> 500, ".1234" -> 123.
            digits
                .bytes()
                .chain(std::iter::repeat(b'0'))
                .take(3)
                .fold(0u16, |acc, b| acc * 10 + (b - b'0') as u16)
        }
    };

    Ok(Some(NmeaTime {
        hour,
        minute,
        second,
        millisecond,
    }))
}

fn parse_date(s: &str, sentence: &'static str) -> Result<Option<NmeaDate>, NmeaError> {
    if s.is_empty() {
        return Ok(None);
    }
    if s.len() != 6 {
        return Err(NmeaError::ParseField {
            sentence,
            field: "date",
        });
    }

    Ok(Some(NmeaDate {
        day: two_digits(&s[0..2], sentence, "day")?,
        month: two_digits(&s[2..4], sentence, "month")?,
        year: two_digits(&s[4..6], sentence, "year")?,
    }))
}

/// Convert `DDMM.MMMM` / `DDDMM.MMMM` plus hemisphere into signed decimal degrees.
fn parse_coordinate(
    value: &str,
    direction: &str,
    sentence: &'static str,
    field: &'static str,
) -> Result<Option<f64>, NmeaError> {
    if value.is_empty() && direction.is_empty() {
        return Ok(None);
    }
    let invalid = NmeaError::ParseField { sentence, field };

    let dot_pos = value.find('.').unwrap_or(value.len());
    if dot_pos < 2 {
        return Err(invalid);
    }

    let degrees: f64 = match &value[..dot_pos - 2] {
        "" => 0.0,
        d => d.parse().map_err(|_| invalid.clone())?,
    };
    let minutes: f64 = value[dot_pos - 2..].parse().map_err(|_| invalid.clone())?;
    if !(degrees.is_finite() && degrees >= 0.0 && (0.0..60.0).contains(&minutes)) {
        return Err(invalid);
    }

    let coord = degrees + minutes / 60.0;

    match direction {
        "N" | "E" => Ok(Some(coord)),
        "S" | "W" => Ok(Some(-coord)),
        _ => Err(invalid),
    }
}

/// XOR of every byte between `$` and `*`.
pub fn calculate_checksum(data: &str) -> u8 {
    data.bytes().fold(0u8, |acc, b| acc ^ b)
}
