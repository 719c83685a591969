//! Price units and conversion to the canonical cents per kWh.

use serde::{Deserialize, Serialize};

/// Unit a source publishes its prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceUnit {
    /// Currency major units per MWh (day-ahead auction results).
    EurPerMwh,
    /// Currency minor units per kWh (retail tariffs). This is the canonical unit.
    CentsPerKwh,
}

impl PriceUnit {
    /// Factor the raw value is divided by to reach cents per kWh.
    ///
    /// 1 MWh is 1000 kWh and one major unit is 100 minor units, so
    /// per-MWh prices shrink by a net factor of 10.
    #[must_use]
    pub const fn divisor(&self) -> f64 {
        match self {
            Self::EurPerMwh => 10.0,
            Self::CentsPerKwh => 1.0,
        }
    }

    /// Converts a raw value in this unit to cents per kWh.
    #[must_use]
    pub fn normalize(&self, raw: f64) -> f64 {
        raw / self.divisor()
    }

    /// Converts a value in cents per kWh back to this unit.
    #[must_use]
    pub fn denormalize(&self, cents_per_kwh: f64) -> f64 {
        cents_per_kwh * self.divisor()
    }

    /// Returns a short label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::EurPerMwh => "EUR/MWh",
            Self::CentsPerKwh => "ct/kWh",
        }
    }
}

impl std::fmt::Display for PriceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Converts `raw` from `unit` to cents per kWh.
#[must_use]
pub fn normalize(raw: f64, unit: PriceUnit) -> f64 {
    unit.normalize(raw)
}

/// Converts cents per kWh back into `unit`.
#[must_use]
pub fn denormalize(cents_per_kwh: f64, unit: PriceUnit) -> f64 {
    unit.denormalize(cents_per_kwh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_day_ahead_divides_by_ten() {
        assert_relative_eq!(normalize(50.0, PriceUnit::EurPerMwh), 5.0);
        assert_relative_eq!(normalize(-3.2, PriceUnit::EurPerMwh), -0.32);
        assert_relative_eq!(normalize(0.0, PriceUnit::EurPerMwh), 0.0);
    }

    #[test]
    fn test_retail_passes_through() {
        assert_relative_eq!(normalize(23.415, PriceUnit::CentsPerKwh), 23.415);
    }

    #[test]
    fn test_day_ahead_roundtrip() {
        for raw in [0.0, 0.01, 49.99, 123.45, -500.0, 4000.0] {
            let cents = normalize(raw, PriceUnit::EurPerMwh);
            assert_relative_eq!(cents * 10.0, raw, epsilon = 1e-9);
            assert_relative_eq!(denormalize(cents, PriceUnit::EurPerMwh), raw, epsilon = 1e-9);
        }
    }
}
