//! Local clock times and UTC conversion.
//!
//! Flight catalogs express departure and arrival as local wall-clock times
//! at each airport. This module turns those into absolute UTC instants.
//!
//! # Time Model
//! - `utc_hour = local_hour - tz_offset`, with calendar normalization:
//!   a negative or >23 result rolls into the adjacent UTC day.
//! - Durations come from local clock fields only. An arrival clock earlier
//!   than the departure clock means the flight lands the next day.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// A wall-clock time of day (`HH:MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocalTime {
    /// Hour of day (0..=23).
    pub hour: u32,
    /// Minute of hour (0..=59).
    pub minute: u32,
}

impl LocalTime {
    /// Creates a clock time, rejecting out-of-range fields.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Parses `HH:MM`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (h, m) = raw.trim().split_once(':')?;
        if h.is_empty() || m.len() != 2 {
            return None;
        }
        Self::new(h.parse().ok()?, m.parse().ok()?)
    }

    /// Minutes elapsed since local midnight.
    #[inline]
    pub fn minutes_of_day(&self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Converts a local clock time on `date` at an airport with `tz_offset`
/// hours from UTC into an absolute UTC instant.
///
/// Callers without a known offset pass `0`.
pub fn local_to_utc(date: NaiveDate, time: LocalTime, tz_offset: i32) -> DateTime<Utc> {
    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    midnight
        + Duration::hours(i64::from(time.hour) - i64::from(tz_offset))
        + Duration::minutes(i64::from(time.minute))
}

/// Flight duration in minutes from local departure and arrival clocks.
///
/// Negative differences wrap by one day.
pub fn duration_minutes(departure: LocalTime, arrival: LocalTime) -> i64 {
    let raw = arrival.minutes_of_day() - departure.minutes_of_day();
    if raw < 0 {
        raw + MINUTES_PER_DAY
    } else {
        raw
    }
}

/// Truncates an instant to UTC midnight of its calendar date.
pub fn utc_midnight(instant: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&instant.date_naive().and_time(NaiveTime::MIN))
}

/// ISO-8601 rendering with millisecond precision and a `Z` suffix
/// (`2025-10-20T10:00:00.000Z`). Usable as a `#[serde(with = ...)]` module.
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Formats an instant.
    pub fn format(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Parses any RFC 3339 timestamp into UTC.
    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw.trim()).map(|t| t.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(instant: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(instant))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}
