//! Display utilities and output formatting for the spotwatt CLI.

use anyhow::{Context, Result};
#[cfg(not(feature = "parquet"))]
use anyhow::bail;
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use spotwatt_lib::prelude::*;
use spotwatt_lib::ViewSnapshot;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Output format for exported data.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
            Format::Parquet => Self::Parquet,
        }
    }
}

/// Parses `--date`, defaulting to today.
pub(crate) fn parse_day(date: Option<&str>) -> Result<DeliveryDay> {
    match date {
        Some(s) => DeliveryDay::parse(s).with_context(|| format!("Invalid date: {s}")),
        None => Ok(DeliveryDay::today()),
    }
}

/// Builds the dashboard, with `zone` overriding the configured one.
pub(crate) fn build_dashboard(config: &Config, zone: Option<&str>) -> Result<Dashboard> {
    let mut config = config.clone();
    if let Some(zone) = zone {
        config.entsoe.zone = zone.to_string();
    }
    Dashboard::from_config(&config, ZoneRegistry::global())
        .context("Failed to set up price sources")
}

/// Loads `day` behind a spinner.
pub(crate) async fn fetch_view(
    dashboard: &Dashboard,
    day: DeliveryDay,
    quiet: bool,
) -> Result<Arc<ViewSnapshot>> {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Invalid progress template")?,
        );
        pb.set_message("Fetching market data...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let outcome = dashboard.load(day).await;
    progress.finish_and_clear();

    outcome
        .view()
        .cloned()
        .context("A newer request replaced this one")
}

/// Write chart rows in the specified format.
pub(crate) fn write_rows<W: Write + Send>(rows: &[ChartRow], writer: W, format: Format) -> Result<()> {
    match format {
        Format::Csv => {
            let formatter = CsvFormatter::new();
            formatter.write_rows(rows, writer)?;
        }
        Format::Json => {
            let formatter = JsonFormatter::new();
            formatter.write_rows(rows, writer)?;
        }
        Format::Ndjson => {
            let formatter = JsonFormatter::ndjson();
            formatter.write_rows(rows, writer)?;
        }
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                let formatter = ParquetFormatter::new();
                formatter.write_rows(rows, writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                bail!("Parquet support not compiled in");
            }
        }
    }

    Ok(())
}

/// Write plain points in the specified format.
pub(crate) fn write_points<W: Write + Send>(
    points: &[PricePoint],
    writer: W,
    format: Format,
) -> Result<()> {
    match format {
        Format::Csv => {
            let formatter = CsvFormatter::new();
            formatter.write_points(points, writer)?;
        }
        Format::Json => {
            let formatter = JsonFormatter::new();
            formatter.write_points(points, writer)?;
        }
        Format::Ndjson => {
            let formatter = JsonFormatter::ndjson();
            formatter.write_points(points, writer)?;
        }
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                let formatter = ParquetFormatter::new();
                formatter.write_points(points, writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                bail!("Parquet support not compiled in");
            }
        }
    }

    Ok(())
}
