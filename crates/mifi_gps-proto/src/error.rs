// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// NMEA sentence decoding errors.
///
/// Everything except [`NmeaError::UnsupportedSentence`] means the line itself
/// is malformed. `UnsupportedSentence` means the framing was fine but the
/// sentence type is not one of the five fragments this crate decodes.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum NmeaError {
    /// Computed checksum does not match the expected value.
    #[error("checksum mismatch: expected {expected:02X}, got {actual:02X}")]
    ChecksumMismatch {
        /// Expected checksum from the sentence.
        expected: u8,
        /// Computed checksum over the sentence body.
        actual: u8,
    },
    /// The checksum field could not be parsed as a hex byte.
    #[error("invalid checksum format")]
    InvalidChecksum,
    /// The sentence has an invalid format (e.g., no leading `$`).
    #[error("invalid NMEA format: {detail}")]
    InvalidFormat {
        /// Description of the format violation.
        detail: &'static str,
    },
    /// The sentence has fewer fields than its type requires.
    #[error("{sentence} sentence has {found} fields, expected at least {expected}")]
    TooFewFields {
        /// NMEA sentence type (e.g., "GGA").
        sentence: &'static str,
        /// Minimum number of comma-separated fields, address included.
        expected: usize,
        /// Number of fields present.
        found: usize,
    },
    /// A required field could not be parsed.
    #[error("invalid {field} in {sentence} sentence")]
    ParseField {
        /// NMEA sentence type (e.g., "GGA", "RMC").
        sentence: &'static str,
        /// Name of the field that failed to parse.
        field: &'static str,
    },
    /// Well-formed sentence of a type this parser does not decode.
    #[error("unsupported sentence type: {kind}")]
    UnsupportedSentence {
        /// Sentence type from the address field (e.g., "GLL", "PGRME").
        kind: String,
    },
}

impl NmeaError {
    /// Returns `true` if the line was well-formed but of an unsupported type.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, NmeaError::UnsupportedSentence { .. })
    }
}
