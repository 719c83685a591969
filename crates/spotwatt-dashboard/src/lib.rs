//! Dashboard state for spotwatt.
//!
//! Fetches both sources for a selected day, derives the comparison views
//! and keeps the most recent result:
//!
//! - [`Config`] - TOML configuration with environment overrides
//! - [`Dashboard`] - Concurrent, generation-tagged view loading
//! - [`build_view`] - Panels from fetch outcomes, one failure at a time
//! - [`render_view`] - Plain-text bar charts

#![doc(issue_tracker_base_url = "https://github.com/spotwatt/spotwatt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod dashboard;
mod panel;
mod render;
mod view;

pub use config::{
    API_KEY_ENV, ClientSection, Config, ConfigError, DeriveSection, DisplaySection,
    EntsoeSection, OctopusSection, ZONE_ENV, mask_secret,
};
pub use dashboard::{Dashboard, LoadOutcome};
pub use panel::{DisplayZone, Panel, PanelKind, PanelState};
pub use render::{DEFAULT_BAR_WIDTH, render_panel, render_view};
pub use view::{DeriveSettings, FetchOutcomes, ViewSnapshot, build_view};
