//! Dashboard panels.

use chrono::{Local, Utc};
use chrono_tz::Tz;
use spotwatt_derive::{AlignMode, SeriesStats, align};
use spotwatt_format::ChartRow;
use spotwatt_types::{DeliveryDay, PricePoint, PriceSeries};

/// The panels a view is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelKind {
    /// Day-ahead prices for the selected day.
    DayAheadCurrent,
    /// Day-ahead prices for the following day.
    DayAheadNext,
    /// Retail tariff rates for the selected day.
    Retail,
    /// Retail rates against simulated retail (day-ahead plus overhead).
    Combined,
    /// Next day's day-ahead prices against the selected day's, by hour of day.
    DayAheadDelta,
}

impl PanelKind {
    /// Returns the identifier used on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DayAheadCurrent => "day-ahead",
            Self::DayAheadNext => "day-ahead-next",
            Self::Retail => "retail",
            Self::Combined => "combined",
            Self::DayAheadDelta => "day-ahead-delta",
        }
    }

    /// Returns the panel heading.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::DayAheadCurrent => "Day-ahead",
            Self::DayAheadNext => "Day-ahead (next day)",
            Self::Retail => "Retail tariff",
            Self::Combined => "Retail vs simulated retail",
            Self::DayAheadDelta => "Day-ahead change (next day minus today)",
        }
    }

    /// States what the delta column of a comparison panel means.
    #[must_use]
    pub const fn delta_meaning(&self) -> Option<&'static str> {
        match self {
            Self::Combined => Some("positive means the dynamic tariff is more expensive"),
            Self::DayAheadDelta => Some("positive means the next day is more expensive"),
            _ => None,
        }
    }

    /// Returns all panels in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::DayAheadCurrent,
            Self::DayAheadNext,
            Self::Retail,
            Self::Combined,
            Self::DayAheadDelta,
        ]
    }
}

impl std::fmt::Display for PanelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PanelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = Self::all().iter().map(Self::as_str).collect();
                format!("unknown panel '{s}', expected one of: {}", names.join(", "))
            })
    }
}

/// What a panel currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    /// A series in cents per kWh.
    Loaded(PriceSeries),
    /// A source failed; the reason is shown in place of the chart.
    NoData {
        /// User-facing explanation.
        reason: String,
    },
    /// The sources answered but published nothing for the day.
    Empty,
}

impl PanelState {
    /// Returns the loaded series, if any.
    #[must_use]
    pub const fn series(&self) -> Option<&PriceSeries> {
        match self {
            Self::Loaded(series) => Some(series),
            _ => None,
        }
    }

    /// Returns true if the state holds a series.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Time zone chart rows are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The machine's local zone.
    #[default]
    Local,
    /// UTC.
    Utc,
    /// A named IANA zone.
    Named(Tz),
}

impl DisplayZone {
    /// Builds the chart row for `point` in this zone.
    #[must_use]
    pub fn row(&self, point: &PricePoint) -> ChartRow {
        match self {
            Self::Local => ChartRow::new(point, &Local),
            Self::Utc => ChartRow::new(point, &Utc),
            Self::Named(tz) => ChartRow::new(point, tz),
        }
    }
}

/// One panel of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Which panel this is.
    pub kind: PanelKind,
    /// The day the primary series belongs to.
    pub day: DeliveryDay,
    /// Primary series or the reason there is none.
    pub state: PanelState,
    /// Reference series for comparison panels.
    pub reference: Option<PriceSeries>,
    /// Alignment used against `reference`.
    pub align: AlignMode,
    /// Primary minus reference, for comparison panels.
    pub delta: Option<PriceSeries>,
    /// Summary of the primary series.
    pub stats: Option<SeriesStats>,
    /// Parse warnings raised by the sources feeding this panel.
    pub warnings: usize,
}

impl Panel {
    /// Creates a single-series panel.
    #[must_use]
    pub fn single(kind: PanelKind, day: DeliveryDay, state: PanelState, warnings: usize) -> Self {
        let stats = state.series().and_then(SeriesStats::compute);
        Self {
            kind,
            day,
            state,
            reference: None,
            align: AlignMode::default(),
            delta: None,
            stats,
            warnings,
        }
    }

    /// Creates a panel comparing `primary` with `reference`.
    #[must_use]
    pub fn comparison(
        kind: PanelKind,
        day: DeliveryDay,
        primary: PriceSeries,
        reference: PriceSeries,
        delta: PriceSeries,
        align: AlignMode,
        warnings: usize,
    ) -> Self {
        let stats = SeriesStats::compute(&primary);
        Self {
            kind,
            day,
            state: PanelState::Loaded(primary),
            reference: Some(reference),
            align,
            delta: Some(delta),
            stats,
            warnings,
        }
    }

    /// Returns the chart rows for this panel; empty unless loaded.
    ///
    /// Comparison rows take their delta from [`Panel::delta`], so the missing
    /// policy it was derived with decides which intervals appear and what a
    /// missing partner shows. The reference value comes from aligning the
    /// primary series with [`Panel::reference`].
    #[must_use]
    pub fn rows(&self, zone: DisplayZone) -> Vec<ChartRow> {
        let Some(primary) = self.state.series() else {
            return Vec::new();
        };
        let (Some(reference), Some(delta)) = (&self.reference, &self.delta) else {
            return primary.iter().map(|p| zone.row(p)).collect();
        };
        primary
            .iter()
            .zip(align(primary, reference, self.align))
            .filter_map(|(point, pair)| {
                let delta = delta.at(point.timestamp)?;
                let row = zone.row(point);
                let row = match pair.right {
                    Some(right) => row.with_reference(right),
                    None => row,
                };
                Some(row.with_delta(delta.value))
            })
            .collect()
    }
}
