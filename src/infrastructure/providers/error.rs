//! # Provider Errors
//!
//! Failures of a live fare source.
//!
//! None of these ever reach the caller of the aggregator: the resilient
//! adapter logs them and substitutes the fallback fare.
//!
//! # Examples
//!
//! ```
//! use fare_compare::infrastructure::providers::error::ProviderError;
//!
//! let error = ProviderError::missing_element(".fare-amount");
//! assert!(error.is_structural());
//!
//! let error = ProviderError::authentication("no API key configured");
//! assert!(!error.is_structural());
//! ```

use thiserror::Error;

/// Error type for live fare retrieval.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Request or page step timed out.
    #[error("provider timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error, including 5xx responses.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Missing or rejected credentials.
    #[error("provider authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("provider rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
    },

    /// Unexpected status, body or page structure.
    #[error("provider protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// A page element the scrape relies on was not found.
    #[error("page element not found: {selector}")]
    MissingElement {
        /// CSS selector that matched nothing.
        selector: String,
    },

    /// A response arrived but held no usable fare.
    #[error("unusable fare payload: {message}")]
    UnusablePayload {
        /// Error message.
        message: String,
    },

    /// Local failure unrelated to the remote side.
    #[error("provider internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a missing element error.
    #[must_use]
    pub fn missing_element(selector: impl Into<String>) -> Self {
        Self::MissingElement {
            selector: selector.into(),
        }
    }

    /// Creates an unusable payload error.
    #[must_use]
    pub fn unusable_payload(message: impl Into<String>) -> Self {
        Self::UnusablePayload {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if the page did not have the expected shape.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::MissingElement { .. } | Self::Protocol { .. })
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
