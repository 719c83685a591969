//! Plain-text rendering of a view.

use std::fmt::Write;

use spotwatt_format::ChartRow;

use crate::{DisplayZone, Panel, PanelState, ViewSnapshot};

const BAR: char = '█';

/// Default chart width in columns, excluding labels.
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// Renders every panel of `view`.
#[must_use]
pub fn render_view(view: &ViewSnapshot, zone: DisplayZone, bar_width: usize) -> String {
    let mut out = String::new();
    for (i, panel) in view.panels.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&render_panel(panel, zone, bar_width));
    }
    out
}

/// Renders one panel: a header with statistics and one bar per interval.
///
/// Comparison panels chart the delta. Negative values extend to the left
/// of the zero axis.
#[must_use]
pub fn render_panel(panel: &Panel, zone: DisplayZone, bar_width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} · {}", panel.kind.title(), panel.day.label());

    match &panel.state {
        PanelState::NoData { reason } => {
            let _ = writeln!(out, "  No data: {reason}");
            return out;
        }
        PanelState::Empty => {
            let _ = writeln!(out, "  No data available");
            return out;
        }
        PanelState::Loaded(_) => {}
    }

    if let Some(stats) = &panel.stats {
        let _ = writeln!(
            out,
            "  min {:.2} ct/kWh at {} · max {:.2} ct/kWh at {} · mean {:.2} ct/kWh",
            stats.min(),
            zone.row(&stats.cheapest).display_time,
            stats.max(),
            zone.row(&stats.priciest).display_time,
            stats.mean,
        );
    }
    if let Some(meaning) = panel.kind.delta_meaning() {
        let _ = writeln!(out, "  delta: {meaning}");
    }
    if panel.warnings > 0 {
        let _ = writeln!(out, "  {} parse warning(s), see log", panel.warnings);
    }

    let rows = panel.rows(zone);
    let comparison = panel.reference.is_some();
    let values: Vec<Option<f64>> = rows
        .iter()
        .map(|r| if comparison { r.delta_cents } else { Some(r.cents) })
        .collect();
    let axis = Axis::fit(values.iter().flatten().copied(), bar_width);

    for (row, value) in rows.iter().zip(values) {
        let _ = writeln!(out, "  {} {} {}", row.display_time, axis.bar(value), label(row, comparison));
    }
    out
}

fn label(row: &ChartRow, comparison: bool) -> String {
    match (comparison, row.compare_cents, row.delta_cents) {
        (true, Some(reference), Some(delta)) => {
            format!("{:>7.2} vs {:>7.2} ({:+.2})", row.cents, reference, delta)
        }
        (true, None, Some(delta)) => format!("{:>7.2} vs       - ({:+.2})", row.cents, delta),
        (true, _, None) => format!("{:>7.2} vs       - ", row.cents),
        (false, _, _) => format!("{:>7.2}", row.cents),
    }
}

/// Column layout shared by all bars of a panel.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Axis {
    negative_cols: usize,
    positive_cols: usize,
    unit: f64,
}

impl Axis {
    fn fit(values: impl Iterator<Item = f64>, width: usize) -> Self {
        let (lowest, highest) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let span = highest - lowest;
        let width = width.max(2);
        if span <= 0.0 {
            return Self {
                negative_cols: 0,
                positive_cols: width,
                unit: 1.0,
            };
        }
        let negative_cols = ((-lowest / span) * width as f64).ceil() as usize;
        Self {
            negative_cols,
            positive_cols: width.saturating_sub(negative_cols),
            unit: span / width as f64,
        }
    }

    fn bar(&self, value: Option<f64>) -> String {
        let len = |v: f64, max: usize| ((v.abs() / self.unit).round() as usize).min(max);
        let (left, right) = match value {
            Some(v) if v < 0.0 => (BAR.to_string().repeat(len(v, self.negative_cols)), String::new()),
            Some(v) => (String::new(), BAR.to_string().repeat(len(v, self.positive_cols))),
            None => (String::new(), String::new()),
        };
        format!(
            "{left:>neg$}│{right:<pos$}",
            neg = self.negative_cols,
            pos = self.positive_cols
        )
    }
}
