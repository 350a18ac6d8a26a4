//! # Application Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)            - invalid input or configuration
//! ├── Aggregation(AggregationError)  - wiring defect during aggregation
//! ├── Repository(RepositoryError)    - booking store failure
//! ├── Validation(String)             - request validation failure
//! └── NotFound { .. }                - unknown resource
//! ```
//!
//! # Examples
//!
//! ```
//! use fare_compare::application::error::ApplicationError;
//!
//! let err = ApplicationError::validation("distance must be positive");
//! assert!(err.is_validation());
//!
//! let err = ApplicationError::not_found("provider", "lyft");
//! assert!(err.is_not_found());
//! ```

use crate::application::services::fare_aggregation::AggregationError;
use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Aggregation wiring defect.
    #[error("aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    /// Booking store error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Returns true if the caller sent something invalid.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Domain(e) => e.is_input_error(),
            _ => false,
        }
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
