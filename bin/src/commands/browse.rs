//! Browse command implementation.
//!
//! This module steps through delivery days interactively, re-fetching on
//! every move.

use crate::commands::show::zone_heading;
use crate::display::{build_dashboard, fetch_view, parse_day};
use anyhow::{Context, Result};
use inquire::{InquireError, Select};
use spotwatt_lib::prelude::*;

/// A navigation choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Previous,
    Next,
    Today,
    Quit,
}

impl Action {
    const ALL: [Self; 4] = [Self::Previous, Self::Next, Self::Today, Self::Quit];

    /// Returns the day to show next, or `None` to stop.
    fn apply(self, day: DeliveryDay) -> Option<DeliveryDay> {
        match self {
            Self::Previous => Some(day.prev()),
            Self::Next => Some(day.next()),
            Self::Today => Some(DeliveryDay::today()),
            Self::Quit => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Previous => "Previous day",
            Self::Next => "Next day",
            Self::Today => "Today",
            Self::Quit => "Quit",
        })
    }
}

/// Show a day, then let the user move between days until they quit.
pub(crate) async fn browse(
    config: &Config,
    date: Option<&str>,
    zone: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let mut day = parse_day(date)?;
    let dashboard = build_dashboard(config, zone)?;
    let display = config.display_zone()?;
    let heading = zone_heading(config, zone);

    loop {
        let view = fetch_view(&dashboard, day, quiet).await?;
        println!("{heading}");
        println!();
        println!("{}", render_view(&view, display, DEFAULT_BAR_WIDTH));

        let choice = match Select::new(&format!("{}:", day.label()), Action::ALL.to_vec()).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Navigation prompt failed"),
        };
        match choice.apply(day) {
            Some(next) => day = next,
            None => break,
        }
    }

    Ok(())
}
