//! Zones command implementation.
//!
//! This module lists the bidding zones spotwatt can query.

use anyhow::Result;
use spotwatt_lib::prelude::*;

/// List bidding zones with an optional search pattern.
pub(crate) fn list_zones(search: Option<&str>) -> Result<()> {
    let registry = ZoneRegistry::global();

    let zones: Vec<_> = match search {
        Some(pattern) => registry.search(pattern),
        None => registry.all().collect(),
    };

    if zones.is_empty() {
        println!("No zones found.");
        return Ok(());
    }

    println!("{:<10} {:<20} {:<28} {:<8}", "CODE", "EIC", "NAME", "CURRENCY");
    println!("{}", "-".repeat(68));

    for zone in &zones {
        println!(
            "{:<10} {:<20} {:<28} {:<8}",
            zone.code(),
            zone.eic(),
            zone.name(),
            zone.currency()
        );
    }

    println!("\nTotal: {} zones", zones.len());
    Ok(())
}
