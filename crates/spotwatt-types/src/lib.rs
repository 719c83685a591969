//! Core types for the spotwatt electricity price dashboard.
//!
//! This crate provides the fundamental data structures used throughout spotwatt:
//!
//! - [`PricePoint`] - A single settlement interval's price
//! - [`PriceSeries`] - A strictly time-ordered sequence of price points
//! - [`Resolution`] - Settlement interval length (`PT15M`, `PT30M`, `PT60M`)
//! - [`PriceUnit`] - Source units and conversion to cents per kWh
//! - [`DeliveryDay`] - The calendar day a view is built for
//! - [`BiddingZone`] - ENTSO-E market area metadata
//! - [`SpotwattError`] - Error taxonomy shared by all crates

#![doc(issue_tracker_base_url = "https://github.com/spotwatt/spotwatt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod delivery_day;
mod error;
mod point;
mod resolution;
mod source;
mod unit;
mod zone;

pub use delivery_day::{DeliveryDay, entsoe_period};
pub use error::{Result, SeriesError, SpotwattError};
pub use point::{PricePoint, PriceSeries};
pub use resolution::{Resolution, ResolutionParseError};
pub use source::SourceKind;
pub use unit::{PriceUnit, denormalize, normalize};
pub use zone::BiddingZone;
