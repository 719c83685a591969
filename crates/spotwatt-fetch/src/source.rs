//! Price sources: one fetch per delivery day, normalized to cents per kWh.

use async_trait::async_trait;
use chrono::TimeDelta;
use chrono_tz::Tz;
use reqwest::Url;
use spotwatt_types::{BiddingZone, DeliveryDay, PriceSeries, SourceKind, SpotwattError};

use crate::{
    HttpClient, ParseWarning,
    parse::{DayFilter, RetailPage, parse_day_ahead, parse_retail_page},
    url::{ENTSOE_BASE_URL, OCTOPUS_BASE_URL, day_ahead_url, retail_rates_url},
};

/// Default Octopus product (Agile, half-hourly dynamic pricing).
pub const DEFAULT_PRODUCT_CODE: &str = "AGILE-FLEX-22-11-25";

/// Default Octopus tariff within [`DEFAULT_PRODUCT_CODE`].
pub const DEFAULT_TARIFF_CODE: &str = "E-1R-AGILE-FLEX-22-11-25-C";

/// Most result pages followed for a single retail query.
const MAX_RETAIL_PAGES: usize = 8;

/// A normalized series for one day, with any parse warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSeries {
    /// Where the series came from.
    pub kind: SourceKind,
    /// The day that was requested.
    pub day: DeliveryDay,
    /// Prices in cents per kWh.
    pub series: PriceSeries,
    /// Recoverable problems found in the payload.
    pub warnings: Vec<ParseWarning>,
}

/// An upstream that yields one price series per delivery day.
#[async_trait]
pub trait PriceSource: Send + Sync + std::fmt::Debug {
    /// Which upstream this is.
    fn kind(&self) -> SourceKind;

    /// Fetches, parses and normalizes the series for `day`.
    async fn fetch(&self, day: DeliveryDay) -> Result<FetchedSeries, SpotwattError>;
}

fn log_warnings(kind: SourceKind, warnings: &[ParseWarning]) {
    for warning in warnings {
        tracing::warn!(source = %kind, %warning, "Lenient parse");
    }
}

/// Settings for the ENTSO-E day-ahead source.
#[derive(Clone)]
pub struct EntsoeConfig {
    /// Security token. Requests fail with a configuration error without it.
    pub api_key: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Bidding zone to query.
    pub zone: BiddingZone,
}

impl EntsoeConfig {
    /// Creates a config for `zone` against the public endpoint.
    #[must_use]
    pub fn new(zone: BiddingZone, api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: ENTSOE_BASE_URL.to_string(),
            zone,
        }
    }
}

impl std::fmt::Debug for EntsoeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntsoeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("zone", &self.zone.code())
            .finish()
    }
}

/// ENTSO-E transparency platform day-ahead prices.
#[derive(Debug, Clone)]
pub struct EntsoeSource {
    client: HttpClient,
    config: EntsoeConfig,
}

impl EntsoeSource {
    /// Creates a new source.
    #[must_use]
    pub const fn new(client: HttpClient, config: EntsoeConfig) -> Self {
        Self { client, config }
    }

    /// Returns the queried bidding zone.
    #[must_use]
    pub const fn zone(&self) -> &BiddingZone {
        &self.config.zone
    }
}

#[async_trait]
impl PriceSource for EntsoeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::DayAhead
    }

    #[tracing::instrument(skip(self), fields(source = "entsoe", zone = %self.config.zone.code()))]
    async fn fetch(&self, day: DeliveryDay) -> Result<FetchedSeries, SpotwattError> {
        let kind = self.kind();
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SpotwattError::Config("no ENTSO-E API key configured".to_string()))?;

        let url = day_ahead_url(&self.config.base_url, api_key, self.config.zone.eic(), day)
            .map_err(|e| SpotwattError::Config(format!("invalid ENTSO-E base URL: {e}")))?;

        tracing::debug!("Requesting day-ahead prices");
        let body = self
            .client
            .get_text(url)
            .await
            .map_err(|e| e.into_spotwatt(kind))?;

        let parsed = parse_day_ahead(&body)?;
        log_warnings(kind, &parsed.warnings);
        tracing::debug!(points = parsed.series.len(), "Day-ahead prices parsed");

        Ok(FetchedSeries {
            kind,
            day,
            series: parsed.series.normalized(kind.unit()),
            warnings: parsed.warnings,
        })
    }
}

/// Settings for the Octopus retail tariff source.
#[derive(Debug, Clone)]
pub struct OctopusConfig {
    /// API base URL.
    pub base_url: String,
    /// Product code.
    pub product_code: String,
    /// Tariff code within the product.
    pub tariff_code: String,
    /// Time zone whose calendar day a query covers.
    pub local_timezone: Tz,
    /// Whether to drop points outside the requested local day.
    pub filter_to_day: bool,
}

impl Default for OctopusConfig {
    fn default() -> Self {
        Self {
            base_url: OCTOPUS_BASE_URL.to_string(),
            product_code: DEFAULT_PRODUCT_CODE.to_string(),
            tariff_code: DEFAULT_TARIFF_CODE.to_string(),
            local_timezone: chrono_tz::Europe::London,
            filter_to_day: true,
        }
    }
}

/// Octopus Energy dynamic retail rates.
#[derive(Debug, Clone)]
pub struct OctopusSource {
    client: HttpClient,
    config: OctopusConfig,
}

impl OctopusSource {
    /// Creates a new source.
    #[must_use]
    pub const fn new(client: HttpClient, config: OctopusConfig) -> Self {
        Self { client, config }
    }

    /// Returns the query window for `day`: the local day widened by one hour
    /// on each side.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if local midnight does not exist in the
    /// configured time zone.
    pub fn query_window(
        &self,
        day: DeliveryDay,
    ) -> Result<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>), SpotwattError> {
        let (start, end) = day.local_window(&self.config.local_timezone).ok_or_else(|| {
            SpotwattError::Config(format!(
                "no local midnight for {day} in {}",
                self.config.local_timezone.name()
            ))
        })?;
        Ok((start - TimeDelta::hours(1), end + TimeDelta::hours(1)))
    }

    async fn fetch_page(&self, url: Url) -> Result<RetailPage, SpotwattError> {
        let body = self
            .client
            .get_text(url)
            .await
            .map_err(|e| e.into_spotwatt(SourceKind::Retail))?;
        parse_retail_page(&body)
    }
}

#[async_trait]
impl PriceSource for OctopusSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Retail
    }

    #[tracing::instrument(skip(self), fields(source = "octopus", tariff = %self.config.tariff_code))]
    async fn fetch(&self, day: DeliveryDay) -> Result<FetchedSeries, SpotwattError> {
        let kind = self.kind();
        let (from, to) = self.query_window(day)?;
        let url = retail_rates_url(
            &self.config.base_url,
            &self.config.product_code,
            &self.config.tariff_code,
            from,
            to,
        )
        .map_err(|e| SpotwattError::Config(format!("invalid Octopus base URL: {e}")))?;

        tracing::debug!(%from, %to, "Requesting retail rates");
        let mut page = self.fetch_page(url).await?;
        let mut pages = 1;
        while let Some(next) = page.next.take() {
            if pages >= MAX_RETAIL_PAGES {
                tracing::warn!(pages, "Retail result truncated at page limit");
                break;
            }
            let next = Url::parse(&next)
                .map_err(|e| SpotwattError::malformed(kind, format!("invalid next link: {e}")))?;
            page.merge(self.fetch_page(next).await?);
            pages += 1;
        }

        let filter = self
            .config
            .filter_to_day
            .then(|| DayFilter::new(day, self.config.local_timezone));
        let parsed = page.into_series(filter);
        log_warnings(kind, &parsed.warnings);
        tracing::debug!(points = parsed.series.len(), pages, "Retail rates parsed");

        Ok(FetchedSeries {
            kind,
            day,
            series: parsed.series.normalized(kind.unit()),
            warnings: parsed.warnings,
        })
    }
}
