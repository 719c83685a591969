//! Series alignment and derived price views for spotwatt.
//!
//! This crate turns normalized price series into the values the dashboard
//! shows:
//!
//! - [`align`] - Pair two series by timestamp, by UTC hour or by position
//! - [`flat_overhead`] - Simulated retail price (spot plus a constant)
//! - [`delta`] - Point-wise difference of two series
//! - [`SeriesResampler`] - Streaming average into coarser intervals
//! - [`SeriesStats`] - Min, max and mean for panel headers

#![doc(issue_tracker_base_url = "https://github.com/spotwatt/spotwatt/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod align;
mod derived;
mod resample;
mod stats;

pub use align::{AlignMode, AlignedPair, align};
pub use derived::{
    DEFAULT_OVERHEAD_CENTS_PER_KWH, MissingPolicy, delta, flat_overhead, shift,
};
pub use resample::{SeriesResampler, resample};
pub use stats::SeriesStats;
