//! Show command implementation.
//!
//! This module fetches all panels for one day and charts them as text.

use crate::display::{build_dashboard, fetch_view, parse_day};
use anyhow::Result;
use spotwatt_lib::prelude::*;

/// Fetch and render all panels for a day.
pub(crate) async fn show(
    config: &Config,
    date: Option<&str>,
    zone: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let day = parse_day(date)?;
    let dashboard = build_dashboard(config, zone)?;
    let display = config.display_zone()?;

    let view = fetch_view(&dashboard, day, quiet).await?;

    println!("{}", zone_heading(config, zone));
    println!();
    print!("{}", render_view(&view, display, DEFAULT_BAR_WIDTH));
    Ok(())
}

/// One line naming the bidding zone being charted.
pub(crate) fn zone_heading(config: &Config, zone: Option<&str>) -> String {
    let code = zone.unwrap_or(&config.entsoe.zone);
    match ZoneRegistry::global().get(code) {
        Some(zone) => format!("Bidding zone: {} ({})", zone.code(), zone.name()),
        None => format!("Bidding zone: {code}"),
    }
}
