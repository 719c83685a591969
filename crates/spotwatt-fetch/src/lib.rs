//! HTTP client and market payload parsing for spotwatt.
//!
//! This crate provides the data acquisition pipeline:
//!
//! - [`url::day_ahead_url`] / [`url::retail_rates_url`] - Request construction
//! - [`HttpClient`] - Shared HTTP client with timeouts, no retries
//! - [`parse_day_ahead`] - Lenient ENTSO-E publication document parsing
//! - [`parse_retail`] - Octopus standard-unit-rates parsing
//! - [`PriceSource`] - One normalized series per delivery day

#![doc(issue_tracker_base_url = "https://github.com/spotwatt/spotwatt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod parse;
mod source;
pub mod url;
mod xml;

pub use client::{ClientConfig, FetchError, HttpClient};
pub use parse::{
    DayFilter, ParseWarning, ParsedSeries, RetailPage, parse_day_ahead, parse_retail,
    parse_retail_page,
};
pub use source::{
    DEFAULT_PRODUCT_CODE, DEFAULT_TARIFF_CODE, EntsoeConfig, EntsoeSource, FetchedSeries,
    OctopusConfig, OctopusSource, PriceSource,
};
