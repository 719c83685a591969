//! Display-ready chart rows.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use spotwatt_types::PricePoint;

/// Rounds cents per kWh to two decimals.
#[must_use]
pub fn round_cents(cents: f64) -> f64 {
    (cents * 100.0).round() / 100.0
}

/// Converts cents per kWh to euros per kWh, rounded to three decimals.
#[must_use]
pub fn round_euros(cents: f64) -> f64 {
    (cents * 10.0).round() / 1000.0
}

/// One interval of a panel as shown on a chart or exported.
///
/// `cents` is the panel's primary value. Comparison panels also carry the
/// reference value and `delta_cents = cents - compare_cents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    /// Interval start (UTC).
    pub timestamp: DateTime<Utc>,
    /// Local wall-clock time, `HH:MM`.
    pub display_time: String,
    /// Local date, `dd.MM.yyyy`.
    pub date: String,
    /// Primary price in cents per kWh, two decimals.
    pub cents: f64,
    /// Primary price in euros per kWh, three decimals.
    pub euros: f64,
    /// Reference price in cents per kWh, if the panel compares two series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_cents: Option<f64>,
    /// Reference price in euros per kWh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_euros: Option<f64>,
    /// Primary minus reference, cents per kWh, two decimals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_cents: Option<f64>,
}

impl ChartRow {
    /// Builds a row for `point`, rendering wall-clock fields in `tz`.
    #[must_use]
    pub fn new<Tz: TimeZone>(point: &PricePoint, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let local = point.timestamp.with_timezone(tz);
        Self {
            timestamp: point.timestamp,
            display_time: local.format("%H:%M").to_string(),
            date: local.format("%d.%m.%Y").to_string(),
            cents: round_cents(point.value),
            euros: round_euros(point.value),
            compare_cents: None,
            compare_euros: None,
            delta_cents: None,
        }
    }

    /// Attaches the reference value the row is compared with.
    #[must_use]
    pub fn with_reference(mut self, reference: f64) -> Self {
        self.compare_cents = Some(round_cents(reference));
        self.compare_euros = Some(round_euros(reference));
        self
    }

    /// Attaches an already computed delta in cents per kWh.
    ///
    /// Rows without a reference partner may still carry a delta, e.g. a
    /// zero filled in for a missing interval.
    #[must_use]
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta_cents = Some(round_cents(delta));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn point(value: f64) -> PricePoint {
        PricePoint::new(Utc.with_ymd_and_hms(2024, 3, 1, 23, 15, 0).unwrap(), value)
    }

    #[test]
    fn test_rounding() {
        assert_relative_eq!(round_cents(12.3456), 12.35);
        assert_relative_eq!(round_cents(-0.004), 0.0);
        assert_relative_eq!(round_euros(12.3456), 0.123);
        assert_relative_eq!(round_euros(-5.12), -0.051);
    }

    #[test]
    fn test_row_in_utc() {
        let row = ChartRow::new(&point(8.126), &Utc);
        assert_eq!(row.display_time, "23:15");
        assert_eq!(row.date, "01.03.2024");
        assert_relative_eq!(row.cents, 8.13);
        assert_relative_eq!(row.euros, 0.081);
        assert!(row.delta_cents.is_none());
    }

    #[test]
    fn test_row_in_local_zone() {
        let row = ChartRow::new(&point(1.0), &chrono_tz::Europe::Berlin);
        assert_eq!(row.display_time, "00:15");
        assert_eq!(row.date, "02.03.2024");
    }

    #[test]
    fn test_comparison() {
        let row = ChartRow::new(&point(30.0), &Utc)
            .with_reference(25.556)
            .with_delta(30.0 - 25.556);
        assert_relative_eq!(row.compare_cents.unwrap(), 25.56);
        assert_relative_eq!(row.compare_euros.unwrap(), 0.256);
        assert_relative_eq!(row.delta_cents.unwrap(), 4.44);
    }

    #[test]
    fn test_delta_without_reference() {
        let row = ChartRow::new(&point(24.0), &Utc).with_delta(0.0);
        assert!(row.compare_cents.is_none());
        assert_eq!(row.delta_cents, Some(0.0));
    }
}
