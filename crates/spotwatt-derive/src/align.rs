//! Pairing of two price series.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use spotwatt_types::{PriceSeries, Resolution};

use crate::resample;

/// How points of the right series are matched to points of the left one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    /// Identical instants only.
    #[default]
    Timestamp,
    /// Same UTC hour; several right points in one hour are averaged.
    Hour,
    /// Point `i` with point `i`, ignoring timestamps.
    Positional,
}

impl AlignMode {
    /// Returns the configuration name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Hour => "hour",
            Self::Positional => "positional",
        }
    }
}

impl std::fmt::Display for AlignMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AlignMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "timestamp" => Ok(Self::Timestamp),
            "hour" => Ok(Self::Hour),
            "positional" => Ok(Self::Positional),
            other => Err(format!("unknown align mode '{other}'")),
        }
    }
}

/// A left point and its right partner, if one was found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedPair {
    /// Timestamp of the left point.
    pub timestamp: DateTime<Utc>,
    /// Left value.
    pub left: f64,
    /// Right value, `None` when the right series has no partner.
    pub right: Option<f64>,
}

impl AlignedPair {
    /// Returns `left - right` when both sides are present.
    #[must_use]
    pub fn difference(&self) -> Option<f64> {
        self.right.map(|right| self.left - right)
    }
}

/// Pairs every point of `left` with a point of `right`.
///
/// The result has exactly `left.len()` entries carrying the left
/// timestamps, whatever the mode.
#[must_use]
pub fn align(left: &PriceSeries, right: &PriceSeries, mode: AlignMode) -> Vec<AlignedPair> {
    match mode {
        AlignMode::Timestamp => left
            .iter()
            .map(|p| AlignedPair {
                timestamp: p.timestamp,
                left: p.value,
                right: right.at(p.timestamp).map(|r| r.value),
            })
            .collect(),
        AlignMode::Hour => {
            let hourly = resample(right, Resolution::Hour1);
            left.iter()
                .map(|p| AlignedPair {
                    timestamp: p.timestamp,
                    left: p.value,
                    right: hourly.at(hour_of(p.timestamp)).map(|r| r.value),
                })
                .collect()
        }
        AlignMode::Positional => left
            .iter()
            .enumerate()
            .map(|(i, p)| AlignedPair {
                timestamp: p.timestamp,
                left: p.value,
                right: right.points().get(i).map(|r| r.value),
            })
            .collect(),
    }
}

fn hour_of(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp
        .duration_trunc(TimeDelta::hours(1))
        .unwrap_or(timestamp)
}
