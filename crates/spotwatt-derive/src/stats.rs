//! Summary statistics for panel headers.

use serde::Serialize;
use spotwatt_types::{PricePoint, PriceSeries};

/// Summary of a non-empty price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    /// Cheapest interval (earliest one on ties).
    pub cheapest: PricePoint,
    /// Most expensive interval (earliest one on ties).
    pub priciest: PricePoint,
    /// Arithmetic mean of all values.
    pub mean: f64,
    /// Number of intervals.
    pub count: usize,
    /// Number of intervals with a price below zero.
    pub negative: usize,
}

impl SeriesStats {
    /// Computes statistics, or `None` for an empty series.
    #[must_use]
    pub fn compute(series: &PriceSeries) -> Option<Self> {
        let first = *series.first()?;
        let mut stats = Self {
            cheapest: first,
            priciest: first,
            mean: 0.0,
            count: 0,
            negative: 0,
        };
        let mut sum = 0.0;

        for point in series {
            if point.value < stats.cheapest.value {
                stats.cheapest = *point;
            }
            if point.value > stats.priciest.value {
                stats.priciest = *point;
            }
            if point.value < 0.0 {
                stats.negative += 1;
            }
            sum += point.value;
            stats.count += 1;
        }

        stats.mean = sum / stats.count as f64;
        Some(stats)
    }

    /// Lowest value.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.cheapest.value
    }

    /// Highest value.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.priciest.value
    }

    /// Difference between the highest and lowest value.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.priciest.value - self.cheapest.value
    }
}
