//! Error types for SeismoScope.
//!
//! This module provides a unified error handling approach using `thiserror`.

use chrono::NaiveDate;
use thiserror::Error;

/// Message shown to the user for any failed feed retrieval.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch earthquake data. Please try again later.";

/// Result type alias for SeismoScope operations.
pub type Result<T> = std::result::Result<T, SeismoError>;

/// Errors that can occur in SeismoScope.
#[derive(Debug, Error)]
pub enum SeismoError {
    /// The feed answered with a non-success HTTP status.
    #[error("HTTP error! status: {status}")]
    HttpStatus {
        /// Status code returned by the server.
        status: u16,
    },

    /// The request could not be sent or the body could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body is not a valid GeoJSON feature collection.
    #[error("Malformed feed body: {0}")]
    Parse(#[from] serde_json::Error),

    /// A custom date outside the window the feed can serve.
    #[error("Date {date} is outside the allowed range {earliest} to {latest}")]
    DateOutOfRange {
        /// Requested date.
        date: NaiveDate,
        /// Oldest date that may be requested.
        earliest: NaiveDate,
        /// Newest date that may be requested.
        latest: NaiveDate,
    },

    /// A custom date that does not parse as `YYYY-MM-DD`.
    #[error("Invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        input: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal error.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl SeismoError {
    /// Create an InvalidDate error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
        }
    }

    /// Whether this error came out of a feed retrieval.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::HttpStatus { .. } | Self::Network(_) | Self::Parse(_)
        )
    }

    /// Text to show in the error banner.
    ///
    /// Retrieval and parse failures collapse into one generic message; input
    /// errors keep their own description so the user can correct them.
    pub fn user_message(&self) -> String {
        if self.is_fetch_failure() {
            FETCH_FAILED_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failures_share_one_message() {
        let http = SeismoError::HttpStatus { status: 503 };
        let parse = SeismoError::Parse(serde_json::from_str::<u8>("{").unwrap_err());

        assert_eq!(http.user_message(), FETCH_FAILED_MESSAGE);
        assert_eq!(parse.user_message(), FETCH_FAILED_MESSAGE);
        assert_eq!(http.to_string(), "HTTP error! status: 503");
    }

    #[test]
    fn input_errors_keep_their_text() {
        let err = SeismoError::invalid_date("yesterday");
        assert!(!err.is_fetch_failure());
        assert!(err.user_message().contains("yesterday"));
    }
}
