//! Release date input parsing and resolution

use crate::error::{EstreiaError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use std::fmt;
use std::str::FromStr;

/// A release date as supplied by a movie record or the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseDateInput {
    /// Plain calendar day (YYYY-MM-DD), taken as-is in the local zone
    Calendar(NaiveDate),
    /// Absolute instant carrying its own offset (RFC 3339)
    Instant(DateTime<FixedOffset>),
    /// Date and time without an offset, read as local wall-clock time
    LocalDateTime(NaiveDateTime),
}

impl ReleaseDateInput {
    /// Parse a release date string
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = || EstreiaError::InvalidReleaseDate(input.to_string());

        if trimmed.len() == 10 && trimmed.contains('-') {
            return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(ReleaseDateInput::Calendar)
                .map_err(|_| invalid());
        }

        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(ReleaseDateInput::Instant(instant));
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(ReleaseDateInput::LocalDateTime(naive));
            }
        }

        Err(invalid())
    }

    /// Calendar day this release falls on, as observed in `tz`
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        match self {
            ReleaseDateInput::Calendar(date) => *date,
            ReleaseDateInput::Instant(instant) => instant.with_timezone(tz).date_naive(),
            ReleaseDateInput::LocalDateTime(naive) => naive.date(),
        }
    }
}

impl FromStr for ReleaseDateInput {
    type Err = EstreiaError;

    fn from_str(s: &str) -> Result<Self> {
        ReleaseDateInput::parse(s)
    }
}

impl fmt::Display for ReleaseDateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseDateInput::Calendar(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            ReleaseDateInput::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
            ReleaseDateInput::LocalDateTime(naive) => {
                write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S"))
            }
        }
    }
}
