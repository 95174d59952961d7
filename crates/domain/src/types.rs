//! Schedule and logging value types

use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::DEFAULT_TIME_ZONE;
use crate::errors::TaskGuardError;
use crate::impl_keyword_conversions;

/// Time zone a recurring expression is evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneSpec {
    /// The process-local zone.
    #[default]
    Default,
    /// A named IANA zone such as `Europe/Berlin`.
    Named(Tz),
}

impl TimeZoneSpec {
    /// Returns the IANA zone, or `None` for the process-local zone.
    pub fn tz(&self) -> Option<Tz> {
        match self {
            Self::Default => None,
            Self::Named(tz) => Some(*tz),
        }
    }
}

impl FromStr for TimeZoneSpec {
    type Err = TaskGuardError;

    /// `"default"` (any case) and the empty string select the local zone.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(DEFAULT_TIME_ZONE) {
            return Ok(Self::Default);
        }
        s.parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| TaskGuardError::InvalidInput(format!("Unknown time zone: {s}")))
    }
}

impl fmt::Display for TimeZoneSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str(DEFAULT_TIME_ZONE),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl Serialize for TimeZoneSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeZoneSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl_keyword_conversions!(LogFormat {
    Pretty => "pretty",
    Json => "json",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keyword_selects_local_zone() {
        assert_eq!("default".parse::<TimeZoneSpec>().unwrap(), TimeZoneSpec::Default);
        assert_eq!("DEFAULT".parse::<TimeZoneSpec>().unwrap(), TimeZoneSpec::Default);
        assert_eq!("".parse::<TimeZoneSpec>().unwrap(), TimeZoneSpec::Default);
        assert_eq!(TimeZoneSpec::Default.tz(), None);
    }

    #[test]
    fn test_named_zone_parses() {
        let spec: TimeZoneSpec = "America/New_York".parse().unwrap();
        assert_eq!(spec, TimeZoneSpec::Named(chrono_tz::America::New_York));
        assert_eq!(spec.to_string(), "America/New_York");
    }

    #[test]
    fn test_unknown_zone_is_invalid_input() {
        let err = "Mars/Olympus_Mons".parse::<TimeZoneSpec>().unwrap_err();
        assert_eq!(err, TaskGuardError::InvalidInput("Unknown time zone: Mars/Olympus_Mons".into()));
    }

    #[test]
    fn test_time_zone_serde_uses_names() {
        let spec = TimeZoneSpec::Named(chrono_tz::Europe::Berlin);
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, "\"Europe/Berlin\"");
        let back: TimeZoneSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
        assert!(serde_json::from_str::<TimeZoneSpec>("\"Nowhere\"").is_err());
    }

    #[test]
    fn test_log_format_keywords() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::Pretty.to_string(), "pretty");
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
