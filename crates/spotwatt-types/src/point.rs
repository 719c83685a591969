//! Price point and series representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PriceUnit, SeriesError};

/// The price of a single settlement interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Start of the settlement interval (UTC).
    pub timestamp: DateTime<Utc>,
    /// Price for the interval. Cents per kWh once normalized.
    pub value: f64,
}

impl PricePoint {
    /// Creates a new price point.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Returns a copy with the value replaced.
    #[must_use]
    pub const fn with_value(self, value: f64) -> Self {
        Self {
            timestamp: self.timestamp,
            value,
        }
    }
}

/// A price series with strictly increasing timestamps.
///
/// A series that nominally covers one day may hold fewer points than the
/// day has intervals (not yet published) or an irregular count around
/// daylight-saving transitions. Nothing in spotwatt assumes a fixed length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Creates a series from points that are already strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns an error if two neighbouring points are out of order or
    /// share a timestamp.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        if let Some(index) = points
            .windows(2)
            .position(|pair| pair[0].timestamp >= pair[1].timestamp)
        {
            return Err(SeriesError::NotIncreasing {
                index: index + 1,
                timestamp: points[index + 1].timestamp,
            });
        }
        Ok(Self { points })
    }

    /// Creates a series from points in any order.
    ///
    /// Points are sorted ascending by timestamp. When several points share a
    /// timestamp the first one in input order is kept.
    #[must_use]
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Self {
        // Stable sort keeps input order among equal timestamps.
        points.sort_by_key(|p| p.timestamp);
        points.dedup_by_key(|p| p.timestamp);
        Self { points }
    }

    /// Creates an empty series.
    #[must_use]
    pub const fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Returns the points as a slice.
    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Consumes the series and returns its points.
    #[must_use]
    pub fn into_points(self) -> Vec<PricePoint> {
        self.points
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Returns an iterator over the points.
    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    /// Returns the point at exactly `timestamp`, if present.
    #[must_use]
    pub fn at(&self, timestamp: DateTime<Utc>) -> Option<&PricePoint> {
        self.points
            .binary_search_by_key(&timestamp, |p| p.timestamp)
            .ok()
            .map(|i| &self.points[i])
    }

    /// Returns a new series with every value transformed by `f`.
    ///
    /// Timestamps are untouched, so the ordering invariant holds.
    #[must_use]
    pub fn map_values(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| p.with_value(f(p.value)))
                .collect(),
        }
    }

    /// Returns a new series converted from `unit` into cents per kWh.
    #[must_use]
    pub fn normalized(&self, unit: PriceUnit) -> Self {
        self.map_values(|v| unit.normalize(v))
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<PricePoint>::deserialize(deserializer)?;
        Self::new(points).map_err(serde::de::Error::custom)
    }
}
