//! Assembling a view from fetch outcomes.

use chrono::TimeDelta;
use spotwatt_derive::{AlignMode, MissingPolicy, delta, flat_overhead, shift};
use spotwatt_fetch::FetchedSeries;
use spotwatt_types::{DeliveryDay, PriceSeries, SpotwattError};

use crate::{Panel, PanelKind, PanelState};

/// Parameters for derived series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeriveSettings {
    /// Constant added to day-ahead prices to simulate a retail price.
    pub overhead_cents_per_kwh: f64,
    /// Pairing used for deltas.
    pub align: AlignMode,
    /// Handling of unpaired points in deltas.
    pub missing: MissingPolicy,
}

impl Default for DeriveSettings {
    fn default() -> Self {
        Self {
            overhead_cents_per_kwh: spotwatt_derive::DEFAULT_OVERHEAD_CENTS_PER_KWH,
            align: AlignMode::default(),
            missing: MissingPolicy::default(),
        }
    }
}

/// The three fetch outcomes a view is built from.
#[derive(Debug)]
pub struct FetchOutcomes {
    /// Day-ahead prices for the selected day.
    pub current: Result<FetchedSeries, SpotwattError>,
    /// Day-ahead prices for the following day.
    pub next: Result<FetchedSeries, SpotwattError>,
    /// Retail rates for the selected day.
    pub retail: Result<FetchedSeries, SpotwattError>,
}

/// Everything shown for one selected day.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    /// The selected day.
    pub day: DeliveryDay,
    /// Load generation that produced this view.
    pub generation: u64,
    /// Panels in display order.
    pub panels: Vec<Panel>,
}

impl ViewSnapshot {
    /// Returns the panel of the given kind.
    #[must_use]
    pub fn panel(&self, kind: PanelKind) -> Option<&Panel> {
        self.panels.iter().find(|p| p.kind == kind)
    }

    /// Total parse warnings across all sources.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        [PanelKind::DayAheadCurrent, PanelKind::DayAheadNext, PanelKind::Retail]
            .iter()
            .filter_map(|kind| self.panel(*kind))
            .map(|p| p.warnings)
            .sum()
    }
}

/// A source outcome reduced to what panels need.
enum Input {
    Series(PriceSeries, usize),
    Empty(usize),
    Failed(String),
}

impl Input {
    fn from_result(result: &Result<FetchedSeries, SpotwattError>) -> Self {
        match result {
            Ok(fetched) if fetched.series.is_empty() => Self::Empty(fetched.warnings.len()),
            Ok(fetched) => Self::Series(fetched.series.clone(), fetched.warnings.len()),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    const fn warnings(&self) -> usize {
        match self {
            Self::Series(_, w) | Self::Empty(w) => *w,
            Self::Failed(_) => 0,
        }
    }

    fn state(&self) -> PanelState {
        match self {
            Self::Series(series, _) => PanelState::Loaded(series.clone()),
            Self::Empty(_) => PanelState::Empty,
            Self::Failed(reason) => PanelState::NoData {
                reason: reason.clone(),
            },
        }
    }
}

/// Combines two inputs for a comparison panel.
///
/// A failure on either side wins over emptiness.
fn compare(
    kind: PanelKind,
    day: DeliveryDay,
    primary: &Input,
    reference: &Input,
    settings: &DeriveSettings,
    reference_of: impl FnOnce(&PriceSeries) -> PriceSeries,
) -> Panel {
    let warnings = primary.warnings() + reference.warnings();
    match (primary, reference) {
        (Input::Series(primary, _), Input::Series(reference, _)) => {
            let reference = reference_of(reference);
            let diff = delta(primary, &reference, settings.align, settings.missing);
            Panel::comparison(
                kind,
                day,
                primary.clone(),
                reference,
                diff,
                settings.align,
                warnings,
            )
        }
        (Input::Failed(reason), _) | (_, Input::Failed(reason)) => Panel::single(
            kind,
            day,
            PanelState::NoData {
                reason: reason.clone(),
            },
            warnings,
        ),
        _ => Panel::single(kind, day, PanelState::Empty, warnings),
    }
}

/// Builds all panels for `day`.
///
/// Each outcome is handled on its own: a failed source only affects the
/// panels that depend on it.
#[must_use]
pub fn build_view(
    day: DeliveryDay,
    generation: u64,
    outcomes: &FetchOutcomes,
    settings: &DeriveSettings,
) -> ViewSnapshot {
    let current = Input::from_result(&outcomes.current);
    let next = Input::from_result(&outcomes.next);
    let retail = Input::from_result(&outcomes.retail);
    let overhead = settings.overhead_cents_per_kwh;

    let panels = vec![
        Panel::single(PanelKind::DayAheadCurrent, day, current.state(), current.warnings()),
        Panel::single(PanelKind::DayAheadNext, day.next(), next.state(), next.warnings()),
        Panel::single(PanelKind::Retail, day, retail.state(), retail.warnings()),
        // retail - (day-ahead + overhead)
        compare(PanelKind::Combined, day, &retail, &current, settings, |spot| {
            flat_overhead(spot, overhead)
        }),
        // day-ahead(d+1) - day-ahead(d), today's prices moved onto tomorrow's clock
        compare(PanelKind::DayAheadDelta, day.next(), &next, &current, settings, |today| {
            shift(today, TimeDelta::days(1))
        }),
    ];

    ViewSnapshot {
        day,
        generation,
        panels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DisplayZone;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, TimeZone, Utc};
    use spotwatt_fetch::ParseWarning;
    use spotwatt_types::{PricePoint, SourceKind};

    fn day() -> DeliveryDay {
        DeliveryDay::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

    fn fetched(kind: SourceKind, day: DeliveryDay, values: &[f64]) -> FetchedSeries {
        let (start, _) = day.utc_window();
        FetchedSeries {
            kind,
            day,
            series: PriceSeries::new(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| PricePoint::new(start + TimeDelta::hours(i as i64), *v))
                    .collect(),
            )
            .unwrap(),
            warnings: Vec::new(),
        }
    }

    fn outcomes() -> FetchOutcomes {
        FetchOutcomes {
            current: Ok(fetched(SourceKind::DayAhead, day(), &[5.0, 6.0, 7.0])),
            next: Ok(fetched(SourceKind::DayAhead, day().next(), &[6.0, 6.0])),
            retail: Ok(fetched(SourceKind::Retail, day(), &[25.0, 24.5, 30.0])),
        }
    }

    #[test]
    fn test_all_panels_loaded() {
        let view = build_view(day(), 1, &outcomes(), &DeriveSettings::default());

        assert_eq!(view.panels.len(), PanelKind::all().len());
        assert!(view.panels.iter().all(|p| p.state.is_loaded()));
        assert_eq!(view.panel(PanelKind::DayAheadNext).unwrap().day, day().next());
    }

    #[test]
    fn test_combined_delta_sign() {
        let view = build_view(day(), 1, &outcomes(), &DeriveSettings::default());
        let combined = view.panel(PanelKind::Combined).unwrap();

        let reference = combined.reference.as_ref().unwrap();
        assert_relative_eq!(reference.points()[0].value, 23.5);
        let delta = combined.delta.as_ref().unwrap();
        // retail 25.0 against 5.0 + 18.5
        assert_relative_eq!(delta.points()[0].value, 1.5);
        assert_relative_eq!(delta.points()[2].value, 30.0 - 25.5);
    }

    #[test]
    fn test_day_ahead_delta_by_hour_of_day() {
        let view = build_view(day(), 1, &outcomes(), &DeriveSettings::default());
        let panel = view.panel(PanelKind::DayAheadDelta).unwrap();
        let delta = panel.delta.as_ref().unwrap();

        assert_eq!(delta.len(), 2);
        assert_eq!(
            delta.points()[0].timestamp,
            Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()
        );
        assert_relative_eq!(delta.points()[0].value, 1.0);
        assert_relative_eq!(delta.points()[1].value, 0.0);
    }

    #[test]
    fn test_failed_source_only_affects_dependents() {
        let mut outcomes = outcomes();
        outcomes.next = Err(SpotwattError::unavailable(SourceKind::DayAhead, 404));
        let view = build_view(day(), 1, &outcomes, &DeriveSettings::default());

        assert!(view.panel(PanelKind::DayAheadCurrent).unwrap().state.is_loaded());
        assert!(view.panel(PanelKind::Retail).unwrap().state.is_loaded());
        assert!(view.panel(PanelKind::Combined).unwrap().state.is_loaded());

        for kind in [PanelKind::DayAheadNext, PanelKind::DayAheadDelta] {
            match &view.panel(kind).unwrap().state {
                PanelState::NoData { reason } => assert!(reason.contains("not have published")),
                other => panic!("expected NoData for {kind}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_source() {
        let mut outcomes = outcomes();
        outcomes.retail = Ok(fetched(SourceKind::Retail, day(), &[]));
        let view = build_view(day(), 1, &outcomes, &DeriveSettings::default());

        assert_eq!(view.panel(PanelKind::Retail).unwrap().state, PanelState::Empty);
        assert_eq!(view.panel(PanelKind::Combined).unwrap().state, PanelState::Empty);
    }

    #[test]
    fn test_warnings_counted() {
        let mut outcomes = outcomes();
        if let Ok(current) = &mut outcomes.current {
            current.warnings.push(ParseWarning::DuplicateTimestamps { dropped: 1 });
        }
        let view = build_view(day(), 1, &outcomes, &DeriveSettings::default());

        assert_eq!(view.panel(PanelKind::DayAheadCurrent).unwrap().warnings, 1);
        assert_eq!(view.panel(PanelKind::Combined).unwrap().warnings, 1);
        assert_eq!(view.warning_count(), 1);
    }

    #[test]
    fn test_overhead_from_settings() {
        let settings = DeriveSettings {
            overhead_cents_per_kwh: 0.0,
            ..DeriveSettings::default()
        };
        let view = build_view(day(), 1, &outcomes(), &settings);
        let combined = view.panel(PanelKind::Combined).unwrap();
        assert_relative_eq!(combined.delta.as_ref().unwrap().points()[0].value, 20.0);
    }

    #[test]
    fn test_combined_rows_follow_missing_policy() {
        let mut outcomes = outcomes();
        outcomes.retail = Ok(fetched(SourceKind::Retail, day(), &[24.0; 24]));
        outcomes.current = Ok(fetched(SourceKind::DayAhead, day(), &[5.0; 23]));
        let last = day().utc_window().0 + TimeDelta::hours(23);

        let zero = build_view(day(), 1, &outcomes, &DeriveSettings::default());
        let rows = zero.panel(PanelKind::Combined).unwrap().rows(DisplayZone::Utc);
        assert_eq!(rows.len(), 24);
        assert_eq!(rows[23].timestamp, last);
        assert_eq!(rows[23].compare_cents, None);
        assert_eq!(rows[23].delta_cents, Some(0.0));
        assert_eq!(rows[0].delta_cents, Some(0.5));

        let settings = DeriveSettings {
            missing: MissingPolicy::Drop,
            ..DeriveSettings::default()
        };
        let dropped = build_view(day(), 1, &outcomes, &settings);
        let panel = dropped.panel(PanelKind::Combined).unwrap();
        let rows = panel.rows(DisplayZone::Utc);
        assert_eq!(rows.len(), 23);
        assert_eq!(rows.len(), panel.delta.as_ref().unwrap().len());
        assert!(rows.iter().all(|r| r.timestamp != last));
    }
}
