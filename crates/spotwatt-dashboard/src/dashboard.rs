//! Generation-tagged view loading.

use spotwatt_fetch::{EntsoeSource, HttpClient, OctopusSource, PriceSource};
use spotwatt_types::{DeliveryDay, SpotwattError};
use spotwatt_zones::ZoneRegistry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::{Config, DeriveSettings, FetchOutcomes, ViewSnapshot, build_view};

/// Result of a [`Dashboard::load`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The view was committed and is now current.
    Committed(Arc<ViewSnapshot>),
    /// A newer load started while this one was in flight; its results
    /// were discarded.
    Stale {
        /// Generation of the discarded load.
        generation: u64,
        /// Generation that superseded it.
        latest: u64,
    },
}

impl LoadOutcome {
    /// Returns the committed view, if any.
    #[must_use]
    pub fn view(&self) -> Option<&Arc<ViewSnapshot>> {
        match self {
            Self::Committed(view) => Some(view),
            Self::Stale { .. } => None,
        }
    }
}

/// Loads and holds the current view.
///
/// Every [`load`](Self::load) takes a new generation before it fetches.
/// Its results are committed only if no later load has started meanwhile,
/// so a slow response for a day the user already navigated away from can
/// never overwrite the newer view.
#[derive(Debug)]
pub struct Dashboard {
    day_ahead: Arc<dyn PriceSource>,
    retail: Arc<dyn PriceSource>,
    settings: DeriveSettings,
    generation: AtomicU64,
    snapshot: RwLock<Option<Arc<ViewSnapshot>>>,
}

impl Dashboard {
    /// Creates a dashboard over the given sources.
    #[must_use]
    pub fn new(
        day_ahead: Arc<dyn PriceSource>,
        retail: Arc<dyn PriceSource>,
        settings: DeriveSettings,
    ) -> Self {
        Self {
            day_ahead,
            retail,
            settings,
            generation: AtomicU64::new(0),
            snapshot: RwLock::new(None),
        }
    }

    /// Creates a dashboard with HTTP sources built from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone is unknown, a configured value is
    /// invalid, or the HTTP client cannot be created.
    pub fn from_config(config: &Config, registry: &ZoneRegistry) -> Result<Self, SpotwattError> {
        let client = HttpClient::new(config.client_config())
            .map_err(|e| SpotwattError::Config(format!("cannot create HTTP client: {e}")))?;
        let day_ahead = EntsoeSource::new(client.clone(), config.entsoe_config(registry)?);
        let retail = OctopusSource::new(client, config.octopus_config()?);

        if config.entsoe.api_key.is_none() {
            tracing::warn!("No ENTSO-E API key configured; day-ahead panels will be empty");
        }

        Ok(Self::new(
            Arc::new(day_ahead),
            Arc::new(retail),
            DeriveSettings {
                overhead_cents_per_kwh: config.derive.overhead_cents_per_kwh,
                align: config.derive.align,
                missing: config.derive.missing,
            },
        ))
    }

    /// Returns the derive settings.
    #[must_use]
    pub const fn settings(&self) -> &DeriveSettings {
        &self.settings
    }

    /// Returns the generation of the most recently started load.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Returns the current view, if one has been committed.
    pub async fn current(&self) -> Option<Arc<ViewSnapshot>> {
        self.snapshot.read().await.clone()
    }

    /// Fetches day-ahead prices for `day` and `day + 1` and retail rates for
    /// `day` concurrently, then builds and commits the view.
    ///
    /// Source failures end up in the affected panels; this never fails.
    #[tracing::instrument(skip(self), fields(generation = tracing::field::Empty))]
    pub async fn load(&self, day: DeliveryDay) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::Span::current().record("generation", generation);

        let (current, next, retail) = futures::join!(
            self.day_ahead.fetch(day),
            self.day_ahead.fetch(day.next()),
            self.retail.fetch(day),
        );
        let outcomes = FetchOutcomes {
            current,
            next,
            retail,
        };
        for (name, result) in [
            ("day-ahead", &outcomes.current),
            ("day-ahead next day", &outcomes.next),
            ("retail", &outcomes.retail),
        ] {
            if let Err(e) = result {
                tracing::warn!(source = name, error = %e, "Fetch failed");
            }
        }

        let view = Arc::new(build_view(day, generation, &outcomes, &self.settings));

        let mut snapshot = self.snapshot.write().await;
        let latest = self.generation();
        if latest != generation {
            tracing::debug!(generation, latest, "Discarding stale view");
            return LoadOutcome::Stale { generation, latest };
        }
        *snapshot = Some(Arc::clone(&view));
        tracing::info!(%day, warnings = view.warning_count(), "View committed");
        LoadOutcome::Committed(view)
    }
}
