//! Synthetic payloads for spotwatt benchmarks.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use spotwatt_types::{PricePoint, PriceSeries};
use std::fmt::Write;

/// Start of the synthetic delivery day.
pub fn day_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A plausible price for interval `i`: a daily curve with a dip below zero.
pub fn price_at(i: usize) -> f64 {
    let x = i as f64 / 4.0;
    60.0 + 40.0 * (x / 24.0 * std::f64::consts::TAU).sin() - if i % 17 == 0 { 70.0 } else { 0.0 }
}

/// An ENTSO-E publication document with one time series of `points`
/// intervals at `minutes` resolution.
pub fn day_ahead_document(points: usize, minutes: i64) -> String {
    let mut body = String::with_capacity(points * 96 + 512);
    body.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Publication_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-3:publicationdocument:7:3">
<mRID>bench</mRID><type>A44</type>
<TimeSeries><mRID>1</mRID><currency_Unit.name>EUR</currency_Unit.name><Period>
<timeInterval><start>2024-03-01T00:00Z</start><end>2024-03-02T00:00Z</end></timeInterval>"#,
    );
    let _ = write!(body, "<resolution>PT{minutes}M</resolution>");
    for i in 0..points {
        let _ = write!(
            body,
            "<Point><position>{}</position><price.amount>{:.2}</price.amount></Point>",
            i + 1,
            price_at(i)
        );
    }
    body.push_str("</Period></TimeSeries></Publication_MarketDocument>");
    body
}

/// An Octopus rates page with `points` half-hourly results, newest first.
pub fn retail_page(points: usize) -> String {
    let start = day_start();
    let mut body = String::from(r#"{"count": 0, "next": null, "previous": null, "results": ["#);
    for i in (0..points).rev() {
        let from = start + TimeDelta::minutes(30 * i as i64);
        let to = from + TimeDelta::minutes(30);
        let _ = write!(
            body,
            r#"{{"value_exc_vat": {:.2}, "value_inc_vat": {:.2}, "valid_from": "{}", "valid_to": "{}", "payment_method": null}}{}"#,
            price_at(i) / 12.0,
            price_at(i) / 10.0,
            from.format("%Y-%m-%dT%H:%M:%SZ"),
            to.format("%Y-%m-%dT%H:%M:%SZ"),
            if i == 0 { "" } else { "," }
        );
    }
    body.push_str("]}");
    body
}

/// A series of `points` intervals `step` apart, offset by `shift_minutes`.
pub fn series(points: usize, step: TimeDelta, shift_minutes: i64) -> PriceSeries {
    let start = day_start() + TimeDelta::minutes(shift_minutes);
    let points: Vec<PricePoint> = (0..points)
        .map(|i| PricePoint::new(start + step * i as i32, price_at(i) / 10.0))
        .collect();
    PriceSeries::from_unsorted(points)
}
