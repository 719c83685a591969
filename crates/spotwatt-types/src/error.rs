//! Error types for spotwatt.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::SourceKind;

/// Result type alias for spotwatt operations.
pub type Result<T> = std::result::Result<T, SpotwattError>;

/// Errors that can occur while fetching and preparing price series.
#[derive(Error, Debug)]
pub enum SpotwattError {
    /// Network-level failure (connect, DNS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The source answered with a non-success status.
    #[error("{origin} unavailable (HTTP {status}){}", .hint.map(|h| format!(": {h}")).unwrap_or_default())]
    SourceUnavailable {
        /// The source that failed.
        origin: SourceKind,
        /// HTTP status code.
        status: u16,
        /// Explanation for the user, if one applies.
        hint: Option<&'static str>,
    },

    /// The response body lacks required structure.
    #[error("Malformed {origin} payload: {reason}")]
    MalformedPayload {
        /// The source that sent the payload.
        origin: SourceKind,
        /// What was wrong with it.
        reason: String,
    },

    /// Bidding zone not found.
    #[error("Unknown bidding zone: {0}")]
    UnknownZone(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpotwattError {
    /// Creates a [`SpotwattError::SourceUnavailable`] with the source's hint.
    #[must_use]
    pub const fn unavailable(origin: SourceKind, status: u16) -> Self {
        Self::SourceUnavailable {
            origin,
            status,
            hint: origin.unavailable_hint(),
        }
    }

    /// Creates a [`SpotwattError::MalformedPayload`].
    #[must_use]
    pub fn malformed(origin: SourceKind, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            origin,
            reason: reason.into(),
        }
    }
}

/// Error for series that break the ordering invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// A point is not strictly after its predecessor.
    #[error("Timestamps not strictly increasing at index {index} ({timestamp})")]
    NotIncreasing {
        /// Index of the offending point.
        index: usize,
        /// Its timestamp.
        timestamp: DateTime<Utc>,
    },
}
