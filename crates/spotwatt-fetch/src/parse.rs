//! Market payload parsing.
//!
//! Both parsers are lenient: structural gaps inside an otherwise readable
//! document are skipped and reported as [`ParseWarning`]s next to the
//! best-effort series. A skipped point is never replaced by a zero price,
//! because zero and negative prices are real market outcomes.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use spotwatt_types::{
    DeliveryDay, PricePoint, PriceSeries, Resolution, SourceKind, SpotwattError,
};

use crate::xml::{self, Element};

/// Root element name of an ENTSO-E "no data" reply.
const ACKNOWLEDGEMENT_ROOT: &str = "Acknowledgement_MarketDocument";

/// A recoverable problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A time-series block was skipped.
    SkippedTimeSeries {
        /// Zero-based index of the block in the document.
        index: usize,
        /// What was missing.
        reason: &'static str,
    },
    /// A block used an unknown resolution and was read as hourly.
    UnknownResolution {
        /// Zero-based index of the block in the document.
        index: usize,
        /// The code found in the document.
        code: String,
    },
    /// A point inside a block was skipped.
    SkippedPoint {
        /// Zero-based index of the enclosing block.
        index: usize,
        /// What was wrong with the point.
        reason: String,
    },
    /// A tariff record was skipped.
    SkippedRecord {
        /// Zero-based index of the record in the `results` array.
        index: usize,
        /// What was wrong with the record.
        reason: String,
    },
    /// Points sharing a timestamp were dropped.
    DuplicateTimestamps {
        /// How many points were dropped.
        dropped: usize,
    },
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SkippedTimeSeries { index, reason } => {
                write!(f, "time series #{index} skipped: {reason}")
            }
            Self::UnknownResolution { index, code } => {
                write!(f, "time series #{index}: unknown resolution '{code}', read as PT60M")
            }
            Self::SkippedPoint { index, reason } => {
                write!(f, "time series #{index}: point skipped: {reason}")
            }
            Self::SkippedRecord { index, reason } => {
                write!(f, "record #{index} skipped: {reason}")
            }
            Self::DuplicateTimestamps { dropped } => {
                write!(f, "{dropped} point(s) with duplicate timestamps dropped")
            }
        }
    }
}

/// A best-effort series together with the warnings raised while parsing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSeries {
    /// The parsed series, in the source's unit.
    pub series: PriceSeries,
    /// Recoverable problems found in the payload.
    pub warnings: Vec<ParseWarning>,
}

impl ParsedSeries {
    /// Builds a series from unsorted points, recording dropped duplicates.
    fn from_points(points: Vec<PricePoint>, mut warnings: Vec<ParseWarning>) -> Self {
        let total = points.len();
        let series = PriceSeries::from_unsorted(points);
        if series.len() < total {
            warnings.push(ParseWarning::DuplicateTimestamps {
                dropped: total - series.len(),
            });
        }
        Self { series, warnings }
    }

    /// Returns true if any warning was raised.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Parses an ENTSO-E day-ahead price document.
///
/// Every `TimeSeries` block contributes the points of its `Period`. A point
/// at 1-based `position` is stamped `start + (position - 1) * resolution`.
/// Values stay in EUR/MWh.
///
/// # Errors
///
/// Returns [`SpotwattError::MalformedPayload`] if the document is not well
/// formed, or if it is an acknowledgement document (the platform's reply
/// when it holds no data for the query).
pub fn parse_day_ahead(body: &str) -> Result<ParsedSeries, SpotwattError> {
    let root = xml::parse_document(body)
        .map_err(|reason| SpotwattError::malformed(SourceKind::DayAhead, reason))?;

    if root.name() == ACKNOWLEDGEMENT_ROOT {
        let reason = root
            .find("Reason")
            .and_then(|r| r.child_text("text"))
            .unwrap_or("acknowledgement without reason");
        return Err(SpotwattError::malformed(
            SourceKind::DayAhead,
            format!("no data published: {reason}"),
        ));
    }

    let mut points = Vec::new();
    let mut warnings = Vec::new();

    for (index, time_series) in root.find_all("TimeSeries").into_iter().enumerate() {
        parse_time_series(index, time_series, &mut points, &mut warnings);
    }

    Ok(ParsedSeries::from_points(points, warnings))
}

fn parse_time_series(
    index: usize,
    time_series: &Element,
    points: &mut Vec<PricePoint>,
    warnings: &mut Vec<ParseWarning>,
) {
    let mut skip = |reason| warnings.push(ParseWarning::SkippedTimeSeries { index, reason });

    let Some(period) = time_series.find("Period") else {
        return skip("missing Period");
    };
    let Some(interval) = period.child("timeInterval") else {
        return skip("missing timeInterval");
    };
    let Some(code) = period.child_text("resolution").filter(|c| !c.is_empty()) else {
        return skip("missing resolution");
    };
    let Some(start) = interval.child_text("start") else {
        return skip("missing period start");
    };
    let Some(start) = parse_instant(start) else {
        return skip("invalid period start");
    };

    let resolution = code.parse::<Resolution>().unwrap_or_else(|_| {
        warnings.push(ParseWarning::UnknownResolution {
            index,
            code: code.to_string(),
        });
        Resolution::Hour1
    });

    for point in period.children_named("Point") {
        match read_point(point, start, resolution) {
            Ok(parsed) => points.push(parsed),
            Err(reason) => warnings.push(ParseWarning::SkippedPoint { index, reason }),
        }
    }
}

fn read_point(
    point: &Element,
    start: DateTime<Utc>,
    resolution: Resolution,
) -> Result<PricePoint, String> {
    let position_text = point.child_text("position").ok_or("missing position")?;
    let position = position_text
        .parse::<i64>()
        .ok()
        .filter(|p| *p >= 1)
        .ok_or_else(|| format!("invalid position '{position_text}'"))?;

    let price_text = point.child_text("price.amount").ok_or("missing price.amount")?;
    let price = price_text
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid price.amount '{price_text}'"))?;

    let timestamp = resolution
        .milliseconds()
        .checked_mul(position - 1)
        .and_then(TimeDelta::try_milliseconds)
        .and_then(|offset| start.checked_add_signed(offset))
        .ok_or_else(|| format!("position {position} out of range"))?;

    Ok(PricePoint::new(timestamp, price))
}

/// Parses the instant formats used in market documents.
///
/// ENTSO-E writes interval bounds without seconds (`2024-03-01T00:00Z`).
fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Keeps only retail points whose local calendar date is the target day.
///
/// The retail query window is wider than one day so that no boundary slot
/// is lost. This filter trims it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayFilter {
    /// The day to keep.
    pub day: DeliveryDay,
    /// Time zone the calendar date is evaluated in.
    pub tz: Tz,
}

impl DayFilter {
    /// Creates a new filter.
    #[must_use]
    pub const fn new(day: DeliveryDay, tz: Tz) -> Self {
        Self { day, tz }
    }

    /// Returns true if `point` falls on the target day.
    #[must_use]
    pub fn keeps(&self, point: &PricePoint) -> bool {
        self.day.contains_local(point.timestamp, &self.tz)
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    results: Vec<RateRecord>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RateRecord {
    #[serde(default)]
    valid_from: Option<String>,
    #[serde(default)]
    value_inc_vat: Option<f64>,
}

/// One page of a retail rates response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetailPage {
    /// Points in upstream order.
    pub points: Vec<PricePoint>,
    /// Records skipped on this page.
    pub warnings: Vec<ParseWarning>,
    /// URL of the next page, if the result set is paginated.
    pub next: Option<String>,
}

impl RetailPage {
    /// Appends another page's points and warnings, taking over its `next` link.
    pub fn merge(&mut self, other: Self) {
        self.points.extend(other.points);
        self.warnings.extend(other.warnings);
        self.next = other.next;
    }

    /// Sorts, de-duplicates and optionally filters the collected points.
    ///
    /// Upstream order is never trusted; the API commonly returns rates
    /// newest first.
    #[must_use]
    pub fn into_series(self, filter: Option<DayFilter>) -> ParsedSeries {
        let points = match filter {
            Some(filter) => self.points.into_iter().filter(|p| filter.keeps(p)).collect(),
            None => self.points,
        };
        ParsedSeries::from_points(points, self.warnings)
    }
}

/// Parses one page of an Octopus standard-unit-rates response.
///
/// Each record becomes a point stamped `valid_from` and valued at the gross
/// (`value_inc_vat`) rate, which is already in cents/pence per kWh.
///
/// # Errors
///
/// Returns [`SpotwattError::MalformedPayload`] if the body is not JSON or has
/// no `results` array.
pub fn parse_retail_page(body: &str) -> Result<RetailPage, SpotwattError> {
    let response: RatesResponse = serde_json::from_str(body)
        .map_err(|e| SpotwattError::malformed(SourceKind::Retail, e.to_string()))?;

    let mut page = RetailPage {
        next: response.next.filter(|n| !n.is_empty()),
        ..RetailPage::default()
    };

    for (index, record) in response.results.into_iter().enumerate() {
        let timestamp = record.valid_from.as_deref().and_then(parse_instant);
        match (timestamp, record.value_inc_vat) {
            (Some(timestamp), Some(value)) if value.is_finite() => {
                page.points.push(PricePoint::new(timestamp, value));
            }
            (None, _) => page.warnings.push(ParseWarning::SkippedRecord {
                index,
                reason: "missing or invalid valid_from".to_string(),
            }),
            (Some(_), _) => page.warnings.push(ParseWarning::SkippedRecord {
                index,
                reason: "missing value_inc_vat".to_string(),
            }),
        }
    }

    Ok(page)
}

/// Parses a single-page Octopus standard-unit-rates response into a series.
///
/// # Errors
///
/// Returns [`SpotwattError::MalformedPayload`] if the body is not JSON or has
/// no `results` array.
pub fn parse_retail(body: &str, filter: Option<DayFilter>) -> Result<ParsedSeries, SpotwattError> {
    parse_retail_page(body).map(|page| page.into_series(filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, TimeZone};

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap()
    }

    fn document(series: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Publication_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-3:publicationdocument:7:3">
  <mRID>1</mRID>
  <type>A44</type>
  {series}
</Publication_MarketDocument>"#
        )
    }

    fn time_series(start: &str, resolution: &str, points: &[(i64, &str)]) -> String {
        let points: String = points
            .iter()
            .map(|(pos, price)| {
                format!("<Point><position>{pos}</position><price.amount>{price}</price.amount></Point>")
            })
            .collect();
        format!(
            "<TimeSeries><mRID>1</mRID><currency_Unit.name>EUR</currency_Unit.name>\
             <Period><timeInterval><start>{start}</start><end>2024-03-02T00:00Z</end></timeInterval>\
             <resolution>{resolution}</resolution>{points}</Period></TimeSeries>"
        )
    }

    #[test]
    fn test_day_ahead_two_hourly_points() {
        let body = document(&time_series(
            "2024-03-01T00:00Z",
            "PT60M",
            &[(1, "50.0"), (2, "60.0")],
        ));
        let parsed = parse_day_ahead(&body).unwrap();

        assert!(!parsed.has_warnings());
        let points = parsed.series.points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].timestamp, utc(1, 0, 0));
        assert_eq!(points[1].timestamp, utc(1, 1, 0));
        assert_relative_eq!(points[0].value, 50.0);
        assert_relative_eq!(points[1].value, 60.0);
    }

    #[test]
    fn test_day_ahead_quarter_hour_offsets() {
        let prices: Vec<(i64, &str)> = (1..=96).map(|p| (p, "12.5")).collect();
        let body = document(&time_series("2024-03-01T00:00Z", "PT15M", &prices));
        let parsed = parse_day_ahead(&body).unwrap();

        let points = parsed.series.points();
        assert_eq!(points.len(), 96);
        for (k, point) in points.iter().enumerate() {
            assert_eq!(point.timestamp, utc(1, 0, 0) + TimeDelta::minutes(15 * k as i64));
        }
    }

    #[test]
    fn test_day_ahead_merges_and_sorts_blocks() {
        let later = time_series("2024-03-01T12:00Z", "PT30M", &[(1, "3"), (2, "4")]);
        let earlier = time_series("2024-03-01T00:00:00Z", "PT30M", &[(2, "2"), (1, "1")]);
        let body = document(&format!("{later}{earlier}"));
        let parsed = parse_day_ahead(&body).unwrap();

        let values: Vec<_> = parsed.series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(parsed.series.points()[1].timestamp, utc(1, 0, 30));
    }

    #[test]
    fn test_day_ahead_keeps_negative_and_zero() {
        let body = document(&time_series(
            "2024-03-01T00:00Z",
            "PT60M",
            &[(1, "-5.12"), (2, "0")],
        ));
        let parsed = parse_day_ahead(&body).unwrap();
        assert_relative_eq!(parsed.series.points()[0].value, -5.12);
        assert_relative_eq!(parsed.series.points()[1].value, 0.0);
    }

    #[test]
    fn test_day_ahead_skips_incomplete_blocks() {
        let no_resolution = "<TimeSeries><Period><timeInterval><start>2024-03-01T00:00Z</start>\
                             </timeInterval><Point><position>1</position><price.amount>1</price.amount>\
                             </Point></Period></TimeSeries>";
        let no_period = "<TimeSeries><mRID>2</mRID></TimeSeries>";
        let good = time_series("2024-03-01T05:00Z", "PT60M", &[(1, "7")]);
        let body = document(&format!("{no_resolution}{no_period}{good}"));
        let parsed = parse_day_ahead(&body).unwrap();

        assert_eq!(parsed.series.len(), 1);
        assert_eq!(parsed.series.points()[0].timestamp, utc(1, 5, 0));
        assert_eq!(
            parsed.warnings,
            vec![
                ParseWarning::SkippedTimeSeries {
                    index: 0,
                    reason: "missing resolution"
                },
                ParseWarning::SkippedTimeSeries {
                    index: 1,
                    reason: "missing Period"
                },
            ]
        );
    }

    #[test]
    fn test_day_ahead_bad_point_is_warned_not_zeroed() {
        let body = document(&time_series(
            "2024-03-01T00:00Z",
            "PT60M",
            &[(1, "10"), (2, "n/a"), (3, "30")],
        ));
        let parsed = parse_day_ahead(&body).unwrap();

        let values: Vec<_> = parsed.series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![10.0, 30.0]);
        assert_eq!(parsed.series.points()[1].timestamp, utc(1, 2, 0));
        assert!(matches!(
            parsed.warnings.as_slice(),
            [ParseWarning::SkippedPoint { index: 0, .. }]
        ));
    }

    #[test]
    fn test_day_ahead_unknown_resolution_reads_hourly() {
        let body = document(&time_series("2024-03-01T00:00Z", "P1D", &[(1, "1"), (2, "2")]));
        let parsed = parse_day_ahead(&body).unwrap();

        assert_eq!(parsed.series.points()[1].timestamp, utc(1, 1, 0));
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::UnknownResolution {
                index: 0,
                code: "P1D".to_string()
            }]
        );
    }

    #[test]
    fn test_day_ahead_duplicate_positions() {
        let body = document(&time_series(
            "2024-03-01T00:00Z",
            "PT60M",
            &[(1, "1"), (1, "9"), (2, "2")],
        ));
        let parsed = parse_day_ahead(&body).unwrap();

        assert_eq!(parsed.series.len(), 2);
        assert_relative_eq!(parsed.series.points()[0].value, 1.0);
        assert_eq!(
            parsed.warnings,
            vec![ParseWarning::DuplicateTimestamps { dropped: 1 }]
        );
    }

    #[test]
    fn test_day_ahead_acknowledgement() {
        let body = r#"<Acknowledgement_MarketDocument xmlns="urn:x">
            <Reason><code>999</code><text>No matching data found for Data item Day-ahead Prices</text></Reason>
            </Acknowledgement_MarketDocument>"#;
        let err = parse_day_ahead(body).unwrap_err();
        assert!(matches!(
            err,
            SpotwattError::MalformedPayload {
                origin: SourceKind::DayAhead,
                ..
            }
        ));
        assert!(err.to_string().contains("No matching data"));
    }

    #[test]
    fn test_day_ahead_not_xml() {
        let err = parse_day_ahead("<html><body>Bad Gateway").unwrap_err();
        assert!(matches!(err, SpotwattError::MalformedPayload { .. }));
    }

    #[test]
    fn test_day_ahead_empty_document() {
        let parsed = parse_day_ahead(&document("")).unwrap();
        assert!(parsed.series.is_empty());
        assert!(!parsed.has_warnings());
    }

    const RETAIL_DESCENDING: &str = r#"{
        "count": 2,
        "next": null,
        "previous": null,
        "results": [
            {"value_exc_vat": 19.05, "value_inc_vat": 20, "valid_from": "2024-03-01T01:00:00Z", "valid_to": "2024-03-01T01:30:00Z", "payment_method": null},
            {"value_exc_vat": 14.29, "value_inc_vat": 15, "valid_from": "2024-03-01T00:00:00Z", "valid_to": "2024-03-01T00:30:00Z", "payment_method": null}
        ]
    }"#;

    #[test]
    fn test_retail_sorted_ascending() {
        let parsed = parse_retail(RETAIL_DESCENDING, None).unwrap();
        let points = parsed.series.points();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].timestamp, utc(1, 0, 0));
        assert_relative_eq!(points[0].value, 15.0);
        assert_eq!(points[1].timestamp, utc(1, 1, 0));
        assert_relative_eq!(points[1].value, 20.0);
    }

    #[test]
    fn test_retail_day_filter() {
        let body = r#"{"results": [
            {"value_inc_vat": 30.0, "valid_from": "2024-03-01T23:30:00Z", "valid_to": "2024-03-02T00:00:00Z"},
            {"value_inc_vat": 20.0, "valid_from": "2024-03-01T12:00:00Z", "valid_to": null},
            {"value_inc_vat": 10.0, "valid_from": "2024-02-29T23:30:00Z", "valid_to": "2024-03-01T00:00:00Z"}
        ]}"#;
        let day = DeliveryDay::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let london = parse_retail(body, Some(DayFilter::new(day, chrono_tz::Europe::London))).unwrap();
        let values: Vec<_> = london.series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![20.0, 30.0]);

        // 23:30Z on Feb 29 is already March 1 in Berlin; 23:30Z on March 1 is not.
        let berlin = parse_retail(body, Some(DayFilter::new(day, chrono_tz::Europe::Berlin))).unwrap();
        let values: Vec<_> = berlin.series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![10.0, 20.0]);
    }

    #[test]
    fn test_retail_skips_incomplete_records() {
        let body = r#"{"results": [
            {"value_inc_vat": 12.0, "valid_from": "2024-03-01T00:00:00Z"},
            {"valid_from": "2024-03-01T00:30:00Z"},
            {"value_inc_vat": 13.0}
        ]}"#;
        let parsed = parse_retail(body, None).unwrap();

        assert_eq!(parsed.series.len(), 1);
        assert_eq!(parsed.warnings.len(), 2);
        assert!(matches!(parsed.warnings[0], ParseWarning::SkippedRecord { index: 1, .. }));
        assert!(matches!(parsed.warnings[1], ParseWarning::SkippedRecord { index: 2, .. }));
    }

    #[test]
    fn test_retail_missing_results() {
        let err = parse_retail(r#"{"detail": "Not found."}"#, None).unwrap_err();
        assert!(matches!(
            err,
            SpotwattError::MalformedPayload {
                origin: SourceKind::Retail,
                ..
            }
        ));
    }

    #[test]
    fn test_retail_page_next_and_merge() {
        let first = parse_retail_page(
            r#"{"next": "https://api.octopus.energy/v1/x?page=2", "results": [
                {"value_inc_vat": 2.0, "valid_from": "2024-03-01T00:30:00Z"}]}"#,
        )
        .unwrap();
        assert_eq!(first.next.as_deref(), Some("https://api.octopus.energy/v1/x?page=2"));

        let mut merged = first;
        merged.merge(
            parse_retail_page(
                r#"{"next": null, "results": [
                    {"value_inc_vat": 1.0, "valid_from": "2024-03-01T00:00:00Z"}]}"#,
            )
            .unwrap(),
        );
        assert!(merged.next.is_none());

        let parsed = merged.into_series(None);
        let values: Vec<_> = parsed.series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_parse_instant_formats() {
        assert_eq!(parse_instant("2024-03-01T05:00Z"), Some(utc(1, 5, 0)));
        assert_eq!(parse_instant("2024-03-01T05:00:00Z"), Some(utc(1, 5, 0)));
        assert_eq!(parse_instant("2024-03-01T06:00:00+01:00"), Some(utc(1, 5, 0)));
        assert_eq!(parse_instant("yesterday"), None);
    }
}
