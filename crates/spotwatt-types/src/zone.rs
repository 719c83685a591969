//! Bidding zone definitions.

use serde::{Deserialize, Serialize};

/// An ENTSO-E bidding zone with a single clearing price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiddingZone {
    /// Short code (e.g., "DE-LU").
    code: String,
    /// Energy Identification Code used as the API domain (e.g., "10Y1001A1001A82H").
    eic: String,
    /// Human-readable name.
    name: String,
    /// Settlement currency of the auction.
    currency: String,
}

impl BiddingZone {
    /// Creates a new bidding zone.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        eic: impl Into<String>,
        name: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            eic: eic.into(),
            name: name.into(),
            currency: currency.into(),
        }
    }

    /// Returns the short zone code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the EIC domain identifier.
    #[must_use]
    pub fn eic(&self) -> &str {
        &self.eic
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the settlement currency.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl std::fmt::Display for BiddingZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}
