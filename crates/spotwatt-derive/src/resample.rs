//! Streaming resampling into coarser settlement intervals.

use chrono::{DateTime, DurationRound, Utc};
use spotwatt_types::{PricePoint, PriceSeries, Resolution};

/// Streaming resampler.
///
/// Averages consecutive points into buckets of the target resolution.
/// Points must arrive in ascending order. A target finer than the input
/// leaves every point in its own bucket.
#[derive(Debug)]
pub struct SeriesResampler {
    resolution: Resolution,
    current: Option<BucketBuilder>,
}

impl SeriesResampler {
    /// Creates a new resampler for the given resolution.
    #[must_use]
    pub const fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            current: None,
        }
    }

    /// Returns the target resolution.
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Processes a point, possibly emitting a completed bucket.
    pub fn process(&mut self, point: PricePoint) -> Option<PricePoint> {
        let bucket_start = self.bucket_start_for(point.timestamp);

        match self.current.take() {
            Some(mut builder) if builder.start == bucket_start => {
                builder.update(point.value);
                self.current = Some(builder);
                None
            }
            Some(builder) => {
                self.current = Some(BucketBuilder::new(bucket_start, point.value));
                Some(builder.finish())
            }
            None => {
                self.current = Some(BucketBuilder::new(bucket_start, point.value));
                None
            }
        }
    }

    /// Finishes resampling, returning any remaining partial bucket.
    #[must_use]
    pub fn finish(self) -> Option<PricePoint> {
        self.current.map(BucketBuilder::finish)
    }

    fn bucket_start_for(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        timestamp
            .duration_trunc(self.resolution.increment())
            .unwrap_or(timestamp)
    }
}

#[derive(Debug)]
struct BucketBuilder {
    start: DateTime<Utc>,
    sum: f64,
    count: u32,
}

impl BucketBuilder {
    const fn new(start: DateTime<Utc>, value: f64) -> Self {
        Self {
            start,
            sum: value,
            count: 1,
        }
    }

    fn update(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn finish(self) -> PricePoint {
        PricePoint::new(self.start, self.sum / f64::from(self.count))
    }
}

/// Averages a whole series into `resolution` buckets.
#[must_use]
pub fn resample(series: &PriceSeries, resolution: Resolution) -> PriceSeries {
    let mut resampler = SeriesResampler::new(resolution);
    let mut points: Vec<PricePoint> = series
        .iter()
        .filter_map(|p| resampler.process(*p))
        .collect();
    points.extend(resampler.finish());
    PriceSeries::from_unsorted(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeDelta, TimeZone, Timelike};

    fn quarter_hours(values: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        PriceSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| PricePoint::new(start + TimeDelta::minutes(15 * i as i64), *v))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_quarter_hours_to_hourly() {
        let s = quarter_hours(&[1.0, 2.0, 3.0, 4.0, 10.0, 20.0]);
        let hourly = resample(&s, Resolution::Hour1);

        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly.points()[0].timestamp.hour(), 12);
        assert_relative_eq!(hourly.points()[0].value, 2.5);
        assert_relative_eq!(hourly.points()[1].value, 15.0);
    }

    #[test]
    fn test_streaming_emits_on_boundary() {
        let mut resampler = SeriesResampler::new(Resolution::Minute30);
        let s = quarter_hours(&[1.0, 3.0, 5.0]);
        let mut it = s.iter().copied();

        assert!(resampler.process(it.next().unwrap()).is_none());
        assert!(resampler.process(it.next().unwrap()).is_none());
        let bucket = resampler.process(it.next().unwrap()).unwrap();
        assert_relative_eq!(bucket.value, 2.0);

        let rest = resampler.finish().unwrap();
        assert_eq!(rest.timestamp.minute(), 30);
        assert_relative_eq!(rest.value, 5.0);
    }

    #[test]
    fn test_finer_target_keeps_points() {
        let s = quarter_hours(&[1.0, 2.0, 3.0]);
        assert_eq!(resample(&s, Resolution::Minute15), s);
    }

    #[test]
    fn test_empty_series() {
        assert!(resample(&PriceSeries::empty(), Resolution::Hour1).is_empty());
    }
}
