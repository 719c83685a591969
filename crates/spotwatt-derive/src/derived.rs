//! Derived series: simulated retail price and differences.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use spotwatt_types::{PricePoint, PriceSeries};

use crate::{AlignMode, align};

/// Default flat overhead (grid fees, levies, taxes) in cents per kWh.
///
/// Only a starting value; the real figure depends on the contract.
pub const DEFAULT_OVERHEAD_CENTS_PER_KWH: f64 = 18.5;

/// What [`delta`] does with a point that has no partner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Emit a zero difference.
    #[default]
    Zero,
    /// Omit the point.
    Drop,
}

impl MissingPolicy {
    /// Returns the configuration name of the policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Drop => "drop",
        }
    }
}

impl std::fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adds a constant `overhead` to every value.
///
/// Turns a wholesale series into a simulated all-in retail price.
#[must_use]
pub fn flat_overhead(series: &PriceSeries, overhead: f64) -> PriceSeries {
    series.map_values(|v| v + overhead)
}

/// Returns `a - b`, pairing points with `mode`.
///
/// Timestamps come from `a`. Under [`MissingPolicy::Zero`] the result has
/// exactly `a.len()` points.
#[must_use]
pub fn delta(a: &PriceSeries, b: &PriceSeries, mode: AlignMode, policy: MissingPolicy) -> PriceSeries {
    let points = align(a, b, mode)
        .into_iter()
        .filter_map(|pair| match (pair.difference(), policy) {
            (Some(diff), _) => Some(PricePoint::new(pair.timestamp, diff)),
            (None, MissingPolicy::Zero) => Some(PricePoint::new(pair.timestamp, 0.0)),
            (None, MissingPolicy::Drop) => None,
        })
        .collect();
    PriceSeries::from_unsorted(points)
}

/// Moves every timestamp by `by`.
///
/// Used to lay one day's series over the next for hour-of-day comparison.
/// Points whose shifted timestamp is out of range are dropped.
#[must_use]
pub fn shift(series: &PriceSeries, by: TimeDelta) -> PriceSeries {
    PriceSeries::from_unsorted(
        series
            .iter()
            .filter_map(|p| {
                p.timestamp
                    .checked_add_signed(by)
                    .map(|timestamp| PricePoint::new(timestamp, p.value))
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn hourly(values: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        PriceSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| PricePoint::new(start + TimeDelta::hours(i as i64), *v))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_overhead_minus_series_is_constant() {
        let spot = hourly(&[-3.2, 0.0, 5.0, 12.75]);
        let retail = flat_overhead(&spot, 18.5);
        let diff = delta(&retail, &spot, AlignMode::Timestamp, MissingPolicy::Zero);

        assert_eq!(diff.len(), spot.len());
        for point in &diff {
            assert_relative_eq!(point.value, 18.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_overhead_is_configurable() {
        let spot = hourly(&[5.0]);
        assert_relative_eq!(flat_overhead(&spot, 0.0).points()[0].value, 5.0);
        assert_relative_eq!(flat_overhead(&spot, 30.0).points()[0].value, 35.0);
    }

    #[test]
    fn test_delta_of_self_is_zero() {
        let s = hourly(&[1.5, -2.0, 7.25]);
        for mode in [AlignMode::Timestamp, AlignMode::Hour, AlignMode::Positional] {
            let d = delta(&s, &s, mode, MissingPolicy::Zero);
            assert_eq!(d.len(), 3);
            assert!(d.iter().all(|p| p.value == 0.0));
        }
    }

    #[test]
    fn test_delta_missing_zero_keeps_length() {
        let a = hourly(&[1.0; 24]);
        let b = hourly(&[0.5; 23]);
        let d = delta(&a, &b, AlignMode::Timestamp, MissingPolicy::Zero);

        assert_eq!(d.len(), 24);
        assert_relative_eq!(d.points()[22].value, 0.5);
        assert_relative_eq!(d.last().unwrap().value, 0.0);
        assert_eq!(d.last().unwrap().timestamp, a.last().unwrap().timestamp);
    }

    #[test]
    fn test_delta_missing_drop() {
        let a = hourly(&[1.0; 24]);
        let b = hourly(&[0.5; 23]);
        let d = delta(&a, &b, AlignMode::Timestamp, MissingPolicy::Drop);
        assert_eq!(d.len(), 23);
    }

    #[test]
    fn test_delta_sign() {
        let retail = hourly(&[30.0]);
        let simulated = hourly(&[25.0]);
        let d = delta(&retail, &simulated, AlignMode::Timestamp, MissingPolicy::Zero);
        assert_relative_eq!(d.points()[0].value, 5.0);
    }

    #[test]
    fn test_shift_by_one_day() {
        let today = hourly(&[1.0, 2.0]);
        let tomorrow = shift(&today, TimeDelta::days(1));
        assert_eq!(
            tomorrow.first().unwrap().timestamp,
            Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()
        );
        assert_relative_eq!(tomorrow.points()[1].value, 2.0);
    }
}
