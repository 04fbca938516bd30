//! Time types shared by the query model

use crate::error::{Result, ValidationError};
use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// Render an instant as ISO-8601 in UTC with millisecond precision,
/// e.g. `2012-01-01T00:00:00.000Z`
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    let sub_millis = instant.timestamp_subsec_nanos() % 1_000_000;
    instant - Duration::nanoseconds(sub_millis as i64)
}

/// Half-open UTC time range `[start, end)`
///
/// Encodes as `"<start>/<end>"`, each endpoint formatted by [`format_instant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    /// Create an interval from two instants in any time zone
    ///
    /// Both endpoints are normalized to UTC and truncated to the wire's
    /// millisecond precision. Fails unless `start < end` after truncation.
    pub fn new<Tz: TimeZone>(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self> {
        let start = truncate_to_millis(start.with_timezone(&Utc));
        let end = truncate_to_millis(end.with_timezone(&Utc));

        if start >= end {
            return Err(ValidationError::InvalidInterval {
                start: format_instant(&start),
                end: format_instant(&end),
            });
        }

        Ok(Self { start, end })
    }

    /// Create an interval from Unix epoch milliseconds
    pub fn from_millis(start_ms: i64, end_ms: i64) -> Result<Self> {
        let start = Utc.timestamp_millis_opt(start_ms).single().ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "interval",
                reason: format!("start {} out of range", start_ms),
            }
        })?;
        let end = Utc.timestamp_millis_opt(end_ms).single().ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "interval",
                reason: format!("end {} out of range", end_ms),
            }
        })?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the interval
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Check if an instant falls inside `[start, end)`
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant < self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", format_instant(&self.start), format_instant(&self.end))
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
