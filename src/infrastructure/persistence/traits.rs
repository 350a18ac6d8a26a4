//! # Repository Traits
//!
//! Port for the append-only booking store.
//!
//! # Examples
//!
//! ```ignore
//! use fare_compare::infrastructure::persistence::traits::BookingRepository;
//!
//! async fn history(repo: &impl BookingRepository, user: &str) {
//!     let bookings = repo.find_by_user(user).await?;
//!     println!("{} has {} bookings", user, bookings.len());
//! }
//! ```

use crate::domain::entities::Booking;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity with this id already stored.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Storage backend unavailable.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Append-only store of bookings.
#[async_trait]
pub trait BookingRepository: Send + Sync + fmt::Debug {
    /// Stores a new booking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if a booking with the same id exists.
    async fn append(&self, booking: &Booking) -> RepositoryResult<()>;

    /// Returns every booking of `user_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn find_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Booking>>;

    /// Returns the number of stored bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    async fn count(&self) -> RepositoryResult<usize>;
}
