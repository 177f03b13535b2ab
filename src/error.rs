//! Error types for the INSPIRE client.

use std::time::Duration;

/// Errors that can occur when talking to INSPIRE or shaping its records.
#[derive(Debug, thiserror::Error)]
pub enum InspireError {
    /// HTTP request failed (connection, TLS, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// INSPIRE answered with a non-success status code.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limited by INSPIRE (HTTP 429).
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// The query was well-formed but matched nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body was not valid JSON or lacked the expected structure.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A derived value needs a field the record does not carry.
    #[error("Record is missing required field '{0}'")]
    MissingField(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InspireError {
    /// True for transport failures and non-2xx responses.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Api { .. } | Self::RateLimited { .. }
        )
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }
}

/// Convenience alias for Results using [`InspireError`].
pub type Result<T> = std::result::Result<T, InspireError>;
