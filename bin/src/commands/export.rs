//! Export command implementation.
//!
//! This module writes one panel's chart-ready data to a file or stdout.

use crate::display::{Format, build_dashboard, fetch_view, parse_day, write_points, write_rows};
use anyhow::{Context, Result, bail};
use spotwatt_lib::prelude::*;
use spotwatt_lib::{Panel, PanelState};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Export one panel for a day.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn export(
    config: &Config,
    kind: PanelKind,
    format: Format,
    output: Option<PathBuf>,
    date: Option<&str>,
    zone: Option<&str>,
    raw: bool,
    quiet: bool,
) -> Result<()> {
    let day = parse_day(date)?;
    let dashboard = build_dashboard(config, zone)?;
    let display = config.display_zone()?;

    let view = fetch_view(&dashboard, day, quiet).await?;
    let panel = view
        .panel(kind)
        .with_context(|| format!("Panel {kind} missing from view"))?;

    if let PanelState::NoData { reason } = &panel.state {
        bail!("No data for {} on {}: {reason}", panel.kind.title(), panel.day);
    }
    if panel.state == PanelState::Empty {
        tracing::warn!(panel = %kind, day = %panel.day, "Panel is empty, writing no rows");
    }

    let output = output.or_else(|| {
        OutputFormat::from(format)
            .is_binary()
            .then(|| default_output(panel, format))
    });

    match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_buffered(panel, display, raw, file, format)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !quiet {
                eprintln!("Output written to: {}", path.display());
            }
        }
        None => write_buffered(panel, display, raw, std::io::stdout(), format)?,
    }

    Ok(())
}

/// `<panel>-<day>.<ext>` in the working directory.
fn default_output(panel: &Panel, format: Format) -> PathBuf {
    PathBuf::from(format!(
        "{}-{}.{}",
        panel.kind,
        panel.day,
        OutputFormat::from(format).extension()
    ))
}

/// Writes the panel through a buffer and flushes it, returning flush errors.
fn write_buffered<W: Write + Send>(
    panel: &Panel,
    display: DisplayZone,
    raw: bool,
    sink: W,
    format: Format,
) -> Result<()> {
    let mut writer = BufWriter::new(sink);
    write_panel(panel, display, raw, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Writes chart rows, or with `raw` the plain series.
///
/// The plain series of a comparison panel is its delta.
fn write_panel<W: Write + Send>(
    panel: &Panel,
    display: DisplayZone,
    raw: bool,
    writer: W,
    format: Format,
) -> Result<()> {
    if raw {
        let series = panel.delta.as_ref().or_else(|| panel.state.series());
        let points = series.map(PriceSeries::points).unwrap_or_default();
        write_points(points, writer, format)
    } else {
        write_rows(&panel.rows(display), writer, format)
    }
}
