//! Settlement interval resolution.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Length of one settlement interval.
///
/// Market documents carry this as an ISO-8601 duration code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Resolution {
    /// 15-minute intervals.
    #[serde(rename = "PT15M")]
    Minute15,
    /// 30-minute intervals.
    #[serde(rename = "PT30M")]
    Minute30,
    /// 60-minute intervals.
    #[default]
    #[serde(rename = "PT60M")]
    Hour1,
}

impl Resolution {
    /// Returns the interval length in minutes.
    #[must_use]
    pub const fn minutes(&self) -> i64 {
        match self {
            Self::Minute15 => 15,
            Self::Minute30 => 30,
            Self::Hour1 => 60,
        }
    }

    /// Returns the interval length in milliseconds.
    #[must_use]
    pub const fn milliseconds(&self) -> i64 {
        self.minutes() * 60 * 1000
    }

    /// Returns the interval length as a [`TimeDelta`].
    #[must_use]
    pub const fn increment(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.milliseconds())
    }

    /// Returns the ISO-8601 duration code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute15 => "PT15M",
            Self::Minute30 => "PT30M",
            Self::Hour1 => "PT60M",
        }
    }

    /// Returns all supported resolutions, finest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Minute15, Self::Minute30, Self::Hour1]
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PT15M" | "15M" => Ok(Self::Minute15),
            "PT30M" | "30M" => Ok(Self::Minute30),
            "PT60M" | "PT1H" | "60M" | "1H" => Ok(Self::Hour1),
            _ => Err(ResolutionParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unsupported resolution code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionParseError(String);

impl std::fmt::Display for ResolutionParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported resolution '{}', expected one of: PT15M, PT30M, PT60M",
            self.0
        )
    }
}

impl std::error::Error for ResolutionParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_milliseconds() {
        assert_eq!(Resolution::Minute15.milliseconds(), 900_000);
        assert_eq!(Resolution::Minute30.milliseconds(), 1_800_000);
        assert_eq!(Resolution::Hour1.milliseconds(), 3_600_000);
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("PT15M".parse::<Resolution>().unwrap(), Resolution::Minute15);
        assert_eq!("pt30m".parse::<Resolution>().unwrap(), Resolution::Minute30);
        assert_eq!("PT1H".parse::<Resolution>().unwrap(), Resolution::Hour1);
        assert!("P1D".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_resolution_display_roundtrip() {
        for resolution in Resolution::all() {
            assert_eq!(resolution.as_str().parse::<Resolution>().unwrap(), *resolution);
        }
    }
}
