//! # Domain Errors
//!
//! Error types for business rule violations and configuration defects.

use crate::domain::value_objects::ProviderId;
use thiserror::Error;

/// Domain layer error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A route request failed validation.
    #[error("invalid route: {0}")]
    InvalidRoute(String),

    /// A coordinate is out of range.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// A provider id has no registered configuration.
    ///
    /// This is an integration defect, never a user input problem.
    #[error("unknown provider: {0}")]
    UnknownProvider(ProviderId),

    /// A provider configuration is internally inconsistent.
    #[error("invalid provider configuration: {0}")]
    InvalidProviderConfig(String),
}

impl DomainError {
    /// Creates an invalid route error.
    #[must_use]
    pub fn invalid_route(message: impl Into<String>) -> Self {
        Self::InvalidRoute(message.into())
    }

    /// Creates an invalid provider configuration error.
    #[must_use]
    pub fn invalid_provider_config(message: impl Into<String>) -> Self {
        Self::InvalidProviderConfig(message.into())
    }

    /// Returns true for errors caused by caller input rather than deployment.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidRoute(_) | Self::InvalidCoordinate(_))
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_not_input_error() {
        let err = DomainError::UnknownProvider(ProviderId::new("lyft"));
        assert!(!err.is_input_error());
        assert_eq!(err.to_string(), "unknown provider: lyft");
    }

    #[test]
    fn invalid_route_is_input_error() {
        let err = DomainError::invalid_route("distance must be positive");
        assert!(err.is_input_error());
        assert!(err.to_string().contains("distance must be positive"));
    }
}
