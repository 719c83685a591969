//! Library for comparing electricity day-ahead prices with dynamic retail
//! tariffs.
//!
//! This is a facade crate that re-exports functionality from the spotwatt
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use spotwatt_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = ZoneRegistry::global();
//!     let config = Config::load(&Config::default_path())?.with_env_overrides();
//!     let dashboard = Dashboard::from_config(&config, registry)?;
//!
//!     if let Some(view) = dashboard.load(DeliveryDay::today()).await.view() {
//!         print!("{}", render_view(view, DisplayZone::Local, DEFAULT_BAR_WIDTH));
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc(issue_tracker_base_url = "https://github.com/spotwatt/spotwatt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use spotwatt_types::*;

// Re-export zone registry
pub use spotwatt_zones::{DEFAULT_ZONE, ZoneRegistry};

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use spotwatt_fetch::{
    ClientConfig, EntsoeConfig, EntsoeSource, FetchError, FetchedSeries, HttpClient,
    OctopusConfig, OctopusSource, ParseWarning, ParsedSeries, PriceSource, parse_day_ahead,
    parse_retail,
};

// Re-export derived views
#[cfg(feature = "derive")]
pub use spotwatt_derive::{
    AlignMode, AlignedPair, MissingPolicy, SeriesResampler, SeriesStats, align, delta,
    flat_overhead, resample, shift,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use spotwatt_format::{
    ChartRow, CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use spotwatt_format::ParquetFormatter;

// Re-export dashboard state
#[cfg(feature = "dashboard")]
pub use spotwatt_dashboard::{
    Config, ConfigError, Dashboard, DeriveSettings, DisplayZone, LoadOutcome, Panel, PanelKind,
    PanelState, ViewSnapshot, build_view, render_panel, render_view,
};

/// Prelude module for convenient imports.
///
/// ```
/// use spotwatt_lib::prelude::*;
/// ```
pub mod prelude {
    pub use spotwatt_types::{
        BiddingZone, DeliveryDay, PricePoint, PriceSeries, PriceUnit, Resolution, Result,
        SourceKind, SpotwattError,
    };

    pub use spotwatt_zones::ZoneRegistry;

    #[cfg(feature = "fetch")]
    pub use spotwatt_fetch::{EntsoeSource, FetchedSeries, HttpClient, OctopusSource, PriceSource};

    #[cfg(feature = "derive")]
    pub use spotwatt_derive::{AlignMode, MissingPolicy, delta, flat_overhead};

    #[cfg(feature = "format")]
    pub use spotwatt_format::{ChartRow, CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use spotwatt_format::ParquetFormatter;

    #[cfg(feature = "dashboard")]
    pub use spotwatt_dashboard::{
        Config, DEFAULT_BAR_WIDTH, Dashboard, DisplayZone, LoadOutcome, PanelKind, render_view,
    };
}
