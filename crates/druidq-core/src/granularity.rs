//! Time bucketing granularities
//!
//! The simple form encodes as a bare lowercase token (`"day"`); the duration
//! and period forms encode as tagged objects.

use crate::error::{require_non_blank, Result, ValidationError};
use crate::types::format_instant;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Named bucketing tokens understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredefinedGranularity {
    All,
    None,
    Second,
    Minute,
    FiveMinute,
    TenMinute,
    FifteenMinute,
    ThirtyMinute,
    Hour,
    SixHour,
    EightHour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl PredefinedGranularity {
    /// Every predefined granularity: `all` and `none`, then finest to coarsest
    pub const ALL_TOKENS: [PredefinedGranularity; 16] = [
        PredefinedGranularity::All,
        PredefinedGranularity::None,
        PredefinedGranularity::Second,
        PredefinedGranularity::Minute,
        PredefinedGranularity::FiveMinute,
        PredefinedGranularity::TenMinute,
        PredefinedGranularity::FifteenMinute,
        PredefinedGranularity::ThirtyMinute,
        PredefinedGranularity::Hour,
        PredefinedGranularity::SixHour,
        PredefinedGranularity::EightHour,
        PredefinedGranularity::Day,
        PredefinedGranularity::Week,
        PredefinedGranularity::Month,
        PredefinedGranularity::Quarter,
        PredefinedGranularity::Year,
    ];

    /// Wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            PredefinedGranularity::All => "all",
            PredefinedGranularity::None => "none",
            PredefinedGranularity::Second => "second",
            PredefinedGranularity::Minute => "minute",
            PredefinedGranularity::FiveMinute => "five_minute",
            PredefinedGranularity::TenMinute => "ten_minute",
            PredefinedGranularity::FifteenMinute => "fifteen_minute",
            PredefinedGranularity::ThirtyMinute => "thirty_minute",
            PredefinedGranularity::Hour => "hour",
            PredefinedGranularity::SixHour => "six_hour",
            PredefinedGranularity::EightHour => "eight_hour",
            PredefinedGranularity::Day => "day",
            PredefinedGranularity::Week => "week",
            PredefinedGranularity::Month => "month",
            PredefinedGranularity::Quarter => "quarter",
            PredefinedGranularity::Year => "year",
        }
    }
}

impl fmt::Display for PredefinedGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredefinedGranularity {
    type Err = ValidationError;

    /// Parse a token, ignoring case
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL_TOKENS
            .iter()
            .copied()
            .find(|g| g.as_str() == lower)
            .ok_or_else(|| ValidationError::UnknownGranularity(s.to_string()))
    }
}

/// Fixed-length buckets measured in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "duration")]
pub struct DurationGranularity {
    duration: u64,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_origin")]
    origin: Option<DateTime<Utc>>,
}

impl DurationGranularity {
    /// Create a duration granularity; `duration_ms` must be positive
    pub fn new(duration_ms: u64) -> Result<Self> {
        if duration_ms == 0 {
            return Err(ValidationError::InvalidValue {
                field: "duration",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            duration: duration_ms,
            origin: None,
        })
    }

    /// Anchor bucket boundaries at `origin`
    pub fn with_origin(mut self, origin: DateTime<Utc>) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration
    }

    pub fn origin(&self) -> Option<DateTime<Utc>> {
        self.origin
    }
}

/// Calendar-aware buckets described by an ISO-8601 period such as `P1D`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "period")]
pub struct PeriodGranularity {
    period: String,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_origin")]
    origin: Option<DateTime<Utc>>,
}

impl PeriodGranularity {
    /// Create a period granularity
    pub fn new(period: impl Into<String>) -> Result<Self> {
        let period = period.into();
        require_non_blank("period", &period)?;
        if !period.starts_with('P') || period.len() < 2 {
            return Err(ValidationError::InvalidValue {
                field: "period",
                reason: format!("'{}' is not an ISO-8601 period", period),
            });
        }
        Ok(Self {
            period,
            time_zone: None,
            origin: None,
        })
    }

    /// Bucket in the given time zone (e.g. `America/Los_Angeles`)
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Result<Self> {
        let time_zone = time_zone.into();
        require_non_blank("timeZone", &time_zone)?;
        self.time_zone = Some(time_zone);
        Ok(self)
    }

    /// Anchor bucket boundaries at `origin`
    pub fn with_origin(mut self, origin: DateTime<Utc>) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn time_zone(&self) -> Option<&str> {
        self.time_zone.as_deref()
    }

    pub fn origin(&self) -> Option<DateTime<Utc>> {
        self.origin
    }
}

fn serialize_origin<S: Serializer>(
    origin: &Option<DateTime<Utc>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match origin {
        Some(instant) => serializer.serialize_str(&format_instant(instant)),
        None => serializer.serialize_none(),
    }
}

/// Query granularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Granularity {
    /// Bare token, e.g. `"day"`
    Simple(PredefinedGranularity),
    Duration(DurationGranularity),
    Period(PeriodGranularity),
}

impl Granularity {
    pub fn simple(granularity: PredefinedGranularity) -> Self {
        Granularity::Simple(granularity)
    }

    /// Shorthand for `Granularity::Duration(DurationGranularity::new(ms)?)`
    pub fn duration(duration_ms: u64) -> Result<Self> {
        DurationGranularity::new(duration_ms).map(Granularity::Duration)
    }

    /// Shorthand for `Granularity::Period(PeriodGranularity::new(period)?)`
    pub fn period(period: impl Into<String>) -> Result<Self> {
        PeriodGranularity::new(period).map(Granularity::Period)
    }

    /// Re-check invariants of a hand-assembled value
    pub fn validate(&self) -> Result<()> {
        match self {
            Granularity::Simple(_) => Ok(()),
            Granularity::Duration(d) => DurationGranularity::new(d.duration).map(|_| ()),
            Granularity::Period(p) => {
                PeriodGranularity::new(p.period.as_str())?;
                if let Some(tz) = &p.time_zone {
                    require_non_blank("timeZone", tz)?;
                }
                Ok(())
            }
        }
    }
}

impl From<PredefinedGranularity> for Granularity {
    fn from(g: PredefinedGranularity) -> Self {
        Granularity::Simple(g)
    }
}

impl From<DurationGranularity> for Granularity {
    fn from(g: DurationGranularity) -> Self {
        Granularity::Duration(g)
    }
}

impl From<PeriodGranularity> for Granularity {
    fn from(g: PeriodGranularity) -> Self {
        Granularity::Period(g)
    }
}

impl FromStr for Granularity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<PredefinedGranularity>().map(Granularity::Simple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_parse_tokens() {
        assert_eq!("day".parse::<PredefinedGranularity>().unwrap(), PredefinedGranularity::Day);
        assert_eq!("ALL".parse::<PredefinedGranularity>().unwrap(), PredefinedGranularity::All);
        assert_eq!(
            "fifteen_minute".parse::<PredefinedGranularity>().unwrap(),
            PredefinedGranularity::FifteenMinute
        );

        let err = "fortnight".parse::<Granularity>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownGranularity("fortnight".to_string()));
    }

    #[test]
    fn test_tokens_match_serde_names() {
        for g in PredefinedGranularity::ALL_TOKENS {
            assert_eq!(serde_json::to_value(g).unwrap(), json!(g.as_str()));
            assert_eq!(g.as_str().parse::<PredefinedGranularity>().unwrap(), g);
        }
    }

    #[test]
    fn test_simple_encodes_as_bare_string() {
        let g = Granularity::simple(PredefinedGranularity::Day);
        assert_eq!(serde_json::to_value(&g).unwrap(), json!("day"));
    }

    #[test]
    fn test_duration_granularity() {
        assert!(Granularity::duration(0).is_err());

        let g = Granularity::duration(7_200_000).unwrap();
        assert_eq!(
            serde_json::to_value(&g).unwrap(),
            json!({"type": "duration", "duration": 7200000})
        );

        let origin = Utc.with_ymd_and_hms(2012, 1, 1, 0, 30, 0).unwrap();
        let g = Granularity::from(DurationGranularity::new(3_600_000).unwrap().with_origin(origin));
        assert_eq!(
            serde_json::to_value(&g).unwrap(),
            json!({"type": "duration", "duration": 3600000, "origin": "2012-01-01T00:30:00.000Z"})
        );
    }

    #[test]
    fn test_period_granularity() {
        assert!(Granularity::period("").is_err());
        assert!(Granularity::period("1D").is_err());

        let g = Granularity::from(
            PeriodGranularity::new("P2D")
                .unwrap()
                .with_time_zone("America/Los_Angeles")
                .unwrap(),
        );
        assert_eq!(
            serde_json::to_value(&g).unwrap(),
            json!({"type": "period", "period": "P2D", "timeZone": "America/Los_Angeles"})
        );
        assert!(g.validate().is_ok());
    }
}
