//! # Timestamp
//!
//! UTC instant used for every lifecycle timestamp in the domain.
//!
//! Domain code never reads the system clock itself; the current instant is
//! supplied by the application clock port and passed down explicitly.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC instant with microsecond-or-better precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Reads the current system time.
    ///
    /// Only clock implementations should call this.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Wraps an existing UTC date-time.
    #[inline]
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Creates a timestamp from seconds since the Unix epoch.
    ///
    /// Returns `None` when the value is out of the representable range.
    #[must_use]
    pub fn from_unix_secs(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// Returns the inner date-time.
    #[inline]
    #[must_use]
    pub const fn get(self) -> DateTime<Utc> {
        self.0
    }

    /// Returns the calendar date of this instant in UTC.
    #[must_use]
    pub fn date(self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Returns this instant shifted by `secs` seconds (negative moves back).
    ///
    /// Returns `self` unchanged if the shift is out of range.
    #[must_use]
    pub fn add_secs(self, secs: i64) -> Self {
        let delta = TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::zero());
        self.0.checked_add_signed(delta).map_or(self, Self)
    }

    /// Returns true if this instant is strictly before `other`.
    #[inline]
    #[must_use]
    pub fn is_before(self, other: Self) -> bool {
        self < other
    }

    /// Returns true if this instant is strictly after `other`.
    #[inline]
    #[must_use]
    pub fn is_after(self, other: Self) -> bool {
        self > other
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }
}
