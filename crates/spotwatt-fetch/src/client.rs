//! HTTP client for the market data APIs.

use reqwest::{Client, Url};
use spotwatt_types::{SourceKind, SpotwattError};
use std::time::Duration;
use thiserror::Error;

/// Longest error body kept for diagnostics.
const MAX_ERROR_BODY: usize = 512;

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("spotwatt/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur during a request.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request could not be completed (connect, DNS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status.
    #[error("Server returned {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Start of the response body, for diagnostics.
        body: String,
    },
}

impl FetchError {
    /// Maps the error into the workspace taxonomy for `origin`.
    ///
    /// Transport errors keep their cause chain (connection refused, DNS,
    /// timeout) but never the request URL, since the day-ahead URL carries
    /// the API key.
    #[must_use]
    pub fn into_spotwatt(self, origin: SourceKind) -> SpotwattError {
        match self {
            Self::Http(e) => SpotwattError::Transport(transport_message(e)),
            Self::Status { status, .. } => SpotwattError::unavailable(origin, status),
        }
    }
}

/// Joins a transport error with its sources, with the request URL removed.
fn transport_message(error: reqwest::Error) -> String {
    let url = error.url().map(Url::to_string);
    let error = error.without_url();

    let mut message = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }

    match url {
        Some(url) => message.replace(&url, "<redacted>"),
        None => message,
    }
}

/// HTTP client shared by all sources.
///
/// No retries are attempted. A failed request is reported to the caller,
/// who re-triggers it.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
}

impl HttpClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs a GET request and returns the body as text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] for non-2xx responses and
    /// [`FetchError::Http`] for transport failures.
    pub async fn get_text(&self, url: Url) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = truncate(&body, MAX_ERROR_BODY).to_string();
            tracing::debug!(status = status.as_u16(), %body, "Upstream returned error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

/// Truncates `s` to at most `max` bytes on a char boundary.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
