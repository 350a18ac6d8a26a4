//! # In-Memory Booking Repository
//!
//! In-memory implementation of [`BookingRepository`].
//!
//! Bookings are kept in insertion order, which is also creation order.

use crate::domain::entities::Booking;
use crate::infrastructure::persistence::traits::{
    BookingRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`BookingRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingRepository {
    storage: Arc<RwLock<Vec<Booking>>>,
}

impl InMemoryBookingRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn append(&self, booking: &Booking) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if storage.iter().any(|existing| existing.id() == booking.id()) {
            return Err(RepositoryError::duplicate(
                "Booking",
                booking.id().to_string(),
            ));
        }
        storage.push(booking.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Booking>> {
        let storage = self.storage.read().await;
        Ok(storage
            .iter()
            .filter(|booking| booking.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.storage.read().await.len())
    }
}
