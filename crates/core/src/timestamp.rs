//! Wall-clock timestamps with an ISO-8601 text form.

use core::str::FromStr;

use chrono::{Local, NaiveDateTime, SubsecRound, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Local, timezone-naive moment with microsecond resolution.
///
/// The text form is `YYYY-MM-DDTHH:MM:SS[.ffffff]`; the fraction is omitted when
/// it is zero. Parsing accepts that form with any fraction length (truncated to
/// microseconds). Strings carrying a UTC offset are rejected: the value has no
/// zone to keep it in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Current local wall-clock time.
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self(value.trunc_subsecs(6))
    }

    pub fn as_naive(&self) -> &NaiveDateTime {
        &self.0
    }

    /// Parse the text form, attributing failures to `field`.
    pub fn parse_field(field: &str, text: &str) -> Result<Self, DomainError> {
        NaiveDateTime::parse_from_str(text, PARSE_FORMAT)
            .map(Self::from_naive)
            .map_err(|e| DomainError::invalid_timestamp(field, format!("{text:?}: {e}")))
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.format(SECONDS_FORMAT))?;
        let micros = self.0.nanosecond() / 1_000;
        if micros != 0 {
            write!(f, ".{micros:06}")?;
        }
        Ok(())
    }
}

impl FromStr for Timestamp {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_field("timestamp", s)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.to_string()
    }
}
