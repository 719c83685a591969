//! Bidding zone registry for the spotwatt electricity price dashboard.
//!
//! This crate provides the ENTSO-E bidding zones spotwatt can query, with
//! the EIC domain identifiers the transparency platform expects.
//!
//! # Example
//!
//! ```
//! use spotwatt_zones::ZoneRegistry;
//!
//! let registry = ZoneRegistry::global();
//!
//! if let Some(zone) = registry.get("de-lu") {
//!     println!("{}: {}", zone.name(), zone.eic());
//! }
//! ```

#![doc(issue_tracker_base_url = "https://github.com/spotwatt/spotwatt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::OnceLock;

use spotwatt_types::BiddingZone;

/// The zone metadata JSON embedded at compile time.
const ZONES_JSON: &str = include_str!("../data/zones.json");

/// Code of the zone used when nothing else is configured.
pub const DEFAULT_ZONE: &str = "DE-LU";

/// Global zone registry instance.
static REGISTRY: OnceLock<ZoneRegistry> = OnceLock::new();

/// Registry of supported bidding zones.
#[derive(Debug)]
pub struct ZoneRegistry {
    zones: BTreeMap<String, BiddingZone>,
}

impl ZoneRegistry {
    /// Returns the global zone registry.
    ///
    /// The registry is initialized lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::load)
    }

    /// Loads zones from the embedded JSON data.
    fn load() -> Self {
        let zones: Vec<BiddingZone> =
            serde_json::from_str(ZONES_JSON).expect("Invalid zones.json");
        Self::from_zones(zones)
    }

    /// Builds a registry from an explicit zone list.
    #[must_use]
    pub fn from_zones(zones: impl IntoIterator<Item = BiddingZone>) -> Self {
        Self {
            zones: zones
                .into_iter()
                .map(|z| (z.code().to_lowercase(), z))
                .collect(),
        }
    }

    /// Looks up a zone by short code (case-insensitive) or EIC identifier.
    #[must_use]
    pub fn get(&self, code_or_eic: &str) -> Option<&BiddingZone> {
        self.zones
            .get(&code_or_eic.to_lowercase())
            .or_else(|| self.zones.values().find(|z| z.eic() == code_or_eic))
    }

    /// Returns the default zone.
    #[must_use]
    pub fn default_zone(&self) -> Option<&BiddingZone> {
        self.get(DEFAULT_ZONE)
    }

    /// Returns all zones ordered by code.
    pub fn all(&self) -> impl Iterator<Item = &BiddingZone> {
        self.zones.values()
    }

    /// Returns the total number of zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Searches zones by code or name (case-insensitive).
    pub fn search(&self, pattern: &str) -> Vec<&BiddingZone> {
        let pattern = pattern.to_lowercase();
        self.zones
            .values()
            .filter(|z| {
                z.code().to_lowercase().contains(&pattern)
                    || z.name().to_lowercase().contains(&pattern)
            })
            .collect()
    }
}
