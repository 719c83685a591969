//! Upstream data source identifiers.

use serde::{Deserialize, Serialize};

use crate::PriceUnit;

/// The upstream API a series was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// ENTSO-E transparency platform day-ahead auction prices.
    DayAhead,
    /// Octopus Energy dynamic retail tariff rates.
    Retail,
}

impl SourceKind {
    /// Returns the unit this source publishes prices in.
    #[must_use]
    pub const fn unit(&self) -> PriceUnit {
        match self {
            Self::DayAhead => PriceUnit::EurPerMwh,
            Self::Retail => PriceUnit::CentsPerKwh,
        }
    }

    /// Returns the source name used in logs and error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DayAhead => "entsoe",
            Self::Retail => "octopus",
        }
    }

    /// Returns a hint shown when the source answers with an error status.
    #[must_use]
    pub const fn unavailable_hint(&self) -> Option<&'static str> {
        match self {
            Self::DayAhead => {
                Some("the market may not have published data for this date yet")
            }
            Self::Retail => None,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
