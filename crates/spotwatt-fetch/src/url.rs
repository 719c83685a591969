//! Request URL construction for the market data APIs.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Url;
use spotwatt_types::{DeliveryDay, entsoe_period};

/// Base URL of the ENTSO-E transparency platform API.
pub const ENTSOE_BASE_URL: &str = "https://web-api.tp.entsoe.eu/api";

/// Base URL of the Octopus Energy REST API.
pub const OCTOPUS_BASE_URL: &str = "https://api.octopus.energy/v1";

/// ENTSO-E document type for day-ahead prices.
pub const DAY_AHEAD_DOCUMENT_TYPE: &str = "A44";

/// Builds the day-ahead price query for one UTC day in one bidding zone.
///
/// The zone is sent as both `in_Domain` and `out_Domain`. The period spans
/// `[day 00:00Z, day+1 00:00Z)` in `YYYYMMDDHH00` form.
///
/// # Errors
///
/// Returns an error if `base` is not a valid URL.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use spotwatt_fetch::url::day_ahead_url;
/// use spotwatt_types::DeliveryDay;
///
/// let day = DeliveryDay::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
/// let url = day_ahead_url("https://web-api.tp.entsoe.eu/api", "KEY", "10Y1001A1001A82H", day).unwrap();
/// assert!(url.as_str().contains("periodStart=202403010000"));
/// assert!(url.as_str().contains("periodEnd=202403020000"));
/// ```
pub fn day_ahead_url(
    base: &str,
    api_key: &str,
    domain: &str,
    day: DeliveryDay,
) -> Result<Url, ::url::ParseError> {
    let (start, end) = day.utc_window();
    let period_start = entsoe_period(start);
    let period_end = entsoe_period(end);
    Url::parse_with_params(
        base,
        &[
            ("securityToken", api_key),
            ("documentType", DAY_AHEAD_DOCUMENT_TYPE),
            ("in_Domain", domain),
            ("out_Domain", domain),
            ("periodStart", period_start.as_str()),
            ("periodEnd", period_end.as_str()),
        ],
    )
}

/// Builds the standard-unit-rates query for a retail tariff.
///
/// # Errors
///
/// Returns an error if `base` is not a valid URL.
pub fn retail_rates_url(
    base: &str,
    product_code: &str,
    tariff_code: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Url, ::url::ParseError> {
    let endpoint = format!(
        "{}/products/{}/tariffs/{}/standard-unit-rates/",
        base.trim_end_matches('/'),
        product_code,
        tariff_code
    );
    Url::parse_with_params(
        &endpoint,
        &[
            ("period_from", from.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("period_to", to.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ],
    )
}
