//! Serde adapter for `createdDate`
//!
//! Written as an RFC 3339 string with millisecond precision
//! (`2024-01-01T00:00:00.000Z`). Read back from either an RFC 3339 string, a
//! zone-less ISO-8601 datetime (taken as UTC) or a number of epoch milliseconds.

use crate::error::{NoteKeeperError, Result as NoteResult};
use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::de::{Error, Unexpected};
use serde::{Deserializer, Serializer};
use std::fmt::Formatter;

/// Drop precision the snapshot cannot hold
pub fn truncate(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(3)
}

/// Current time at snapshot precision
pub fn now() -> DateTime<Utc> {
    truncate(Utc::now())
}

/// Years an RFC 3339 timestamp can carry
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// Reject timestamps whose formatted form would not parse back
pub fn check_range(value: DateTime<Utc>) -> NoteResult<DateTime<Utc>> {
    if YEAR_RANGE.contains(&value.year()) {
        Ok(value)
    } else {
        Err(NoteKeeperError::InvalidDate(format!(
            "{} is outside years 0000-9999",
            format(&value)
        )))
    }
}

/// Format a timestamp the way the snapshot stores it
pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp string from a snapshot
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let parsed = match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => parsed.with_timezone(&Utc),
        Err(_) => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()?
            .and_utc(),
    };
    YEAR_RANGE.contains(&parsed.year()).then_some(parsed)
}

/// Serialize with [`format`]
pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

/// Deserialize from a string or epoch milliseconds
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    struct TimestampVisitor;

    impl<'de> serde::de::Visitor<'de> for TimestampVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("an RFC 3339 timestamp or epoch milliseconds")
        }

        fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
            parse(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
        }

        fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
            DateTime::from_timestamp_millis(v)
                .filter(|at| YEAR_RANGE.contains(&at.year()))
                .ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v)
                .ok()
                .and_then(DateTime::from_timestamp_millis)
                .filter(|at| YEAR_RANGE.contains(&at.year()))
                .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: Error>(self, v: f64) -> Result<Self::Value, E> {
            if !v.is_finite() {
                return Err(E::invalid_value(Unexpected::Float(v), &self));
            }
            self.visit_i64(v.round() as i64)
        }
    }

    deserializer.deserialize_any(TimestampVisitor)
}
