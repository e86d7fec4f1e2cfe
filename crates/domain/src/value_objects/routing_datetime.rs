//! Routing timestamp value object
//!
//! Every provider reports times differently (ISO-8601 with offsets, bare
//! local datetimes, or durations from "now"). The whole pipeline normalizes
//! to one compact text format, `YYYYMMDDTHHMMSS`, with no timezone.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::DomainError;

const WIRE_FORMAT: &str = "%Y%m%dT%H%M%S";

/// A local, timezone-naive timestamp in the `YYYYMMDDTHHMMSS` wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoutingDateTime(NaiveDateTime);

impl RoutingDateTime {
    /// Wrap a naive datetime
    #[must_use]
    pub const fn new(inner: NaiveDateTime) -> Self {
        Self(inner)
    }

    /// Current local wall-clock time
    #[must_use]
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    /// Parse a provider timestamp, tolerating ISO-8601 separators
    ///
    /// Strips `-` and `:` and turns a space separator into `T`, so
    /// `2025-11-21T07:30:00`, `2025-11-21 07:30:00` and `20251121T073000`
    /// all parse. Trailing offsets or fractional seconds are ignored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimestamp` if no datetime can be read.
    pub fn parse_lenient(raw: &str) -> Result<Self, DomainError> {
        let compact: String = raw
            .trim()
            .replace('-', "")
            .replace(':', "")
            .replace(' ', "T");
        let compact = compact.get(..15).unwrap_or(&compact);
        NaiveDateTime::parse_from_str(compact, WIRE_FORMAT)
            .map(Self)
            .map_err(|_| DomainError::InvalidTimestamp(raw.to_string()))
    }

    /// This timestamp shifted forward by whole seconds
    ///
    /// Returns `None` when the shift would overflow the representable
    /// datetime range, which can happen with garbage provider durations.
    #[must_use]
    pub fn plus_seconds(&self, seconds: i64) -> Option<Self> {
        Duration::try_seconds(seconds)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
    }

    /// Access the underlying naive datetime
    #[must_use]
    pub const fn inner(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for RoutingDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WIRE_FORMAT))
    }
}

impl FromStr for RoutingDateTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s, WIRE_FORMAT)
            .map(Self)
            .map_err(|_| DomainError::InvalidTimestamp(s.to_string()))
    }
}

impl Serialize for RoutingDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RoutingDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
