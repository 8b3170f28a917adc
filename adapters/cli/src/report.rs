//! Shift-report share codes summarizing one simulated night.

use std::fmt;

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use night_watch_core::{NightIndex, NightStatus};
use night_watch_rendering::clock_label;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const REPORT_DOMAIN: &str = "shift";
const REPORT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded report payload.
pub(crate) const REPORT_HEADER: &str = "shift:v1";
/// Delimiter used to separate the prefix, night segment and payload.
const FIELD_DELIMITER: char = ':';
/// Marker opening the night segment, as in `n3`.
const NIGHT_MARKER: char = 'n';

/// Outcome of one night, shareable as a single-line code.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ShiftReport {
    /// Night the session was armed with.
    pub night: NightIndex,
    /// Seed that anchored the night's random stream.
    pub seed: u64,
    /// Status the session ended in.
    pub outcome: NightStatus,
    /// Game-minutes on the clock when the session ended.
    pub minutes_survived: f32,
    /// Power left on the 0 to 100 scale when the session ended.
    pub power_remaining: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableReport {
    seed: u64,
    outcome: NightStatus,
    minutes_survived: f32,
    power_remaining: f32,
}

impl ShiftReport {
    /// Encodes the report into a single-line string suitable for sharing.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableReport {
            seed: self.seed,
            outcome: self.outcome,
            minutes_survived: self.minutes_survived,
            power_remaining: self.power_remaining,
        };
        let json = serde_json::to_vec(&payload).expect("shift report serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!(
            "{REPORT_HEADER}{FIELD_DELIMITER}{NIGHT_MARKER}{}{FIELD_DELIMITER}{encoded}",
            self.night.get()
        )
    }

    /// Decodes a report from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, ReportCodeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ReportCodeError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(ReportCodeError::MissingPrefix)?;
        let version = parts.next().ok_or(ReportCodeError::MissingVersion)?;
        let night = parts.next().ok_or(ReportCodeError::MissingNight)?;
        let payload = parts.next().ok_or(ReportCodeError::MissingPayload)?;

        if domain != REPORT_DOMAIN {
            return Err(ReportCodeError::InvalidPrefix(domain.to_owned()));
        }
        if version != REPORT_VERSION {
            return Err(ReportCodeError::UnsupportedVersion(version.to_owned()));
        }

        let night = parse_night(night)?;
        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let decoded: SerializableReport = serde_json::from_slice(&bytes)?;

        Ok(Self {
            night,
            seed: decoded.seed,
            outcome: decoded.outcome,
            minutes_survived: decoded.minutes_survived,
            power_remaining: decoded.power_remaining,
        })
    }
}

impl fmt::Display for ShiftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = match self.outcome {
            NightStatus::Running => "unresolved",
            NightStatus::Won => "survived",
            NightStatus::Lost => "breached",
        };
        write!(
            f,
            "night {} (seed {}): {} at {} with {:.1}% power",
            self.night.get(),
            self.seed,
            verdict,
            clock_label(self.minutes_survived),
            self.power_remaining
        )
    }
}

/// Errors that can occur while decoding shift-report codes.
#[derive(Debug, Error)]
pub(crate) enum ReportCodeError {
    /// The provided string was empty or contained only whitespace.
    #[error("shift code was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded report.
    #[error("shift code is missing the prefix")]
    MissingPrefix,
    /// The encoded report did not contain a version segment.
    #[error("shift code is missing the version")]
    MissingVersion,
    /// The encoded report did not include the night segment.
    #[error("shift code is missing the night segment")]
    MissingNight,
    /// The encoded report did not include the payload segment.
    #[error("shift code is missing the payload")]
    MissingPayload,
    /// The encoded report used an unexpected prefix segment.
    #[error("shift code prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded report used an unsupported version identifier.
    #[error("shift code version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The night segment could not be parsed.
    #[error("could not parse night segment '{0}'")]
    InvalidNight(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode shift payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse shift payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

fn parse_night(segment: &str) -> Result<NightIndex, ReportCodeError> {
    let digits = segment
        .strip_prefix(NIGHT_MARKER)
        .ok_or_else(|| ReportCodeError::InvalidNight(segment.to_owned()))?;
    let night = digits
        .parse::<u32>()
        .map_err(|_| ReportCodeError::InvalidNight(segment.to_owned()))?;
    if night == 0 {
        return Err(ReportCodeError::InvalidNight(segment.to_owned()));
    }
    Ok(NightIndex::new(night))
}
