//! # Booking Entity
//!
//! A ride booking request recorded against a chosen provider fare.
//!
//! Bookings are append-only: once stored they are never updated or removed.

use crate::domain::value_objects::{BookingId, Coordinate, ProviderId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Recorded, not yet confirmed by the provider.
    #[default]
    Pending,
    /// Ride completed.
    Completed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    id: BookingId,
    user_id: String,
    service_id: ProviderId,
    pickup: Coordinate,
    destination: Coordinate,
    fare: u64,
    booking_time: Timestamp,
    status: BookingStatus,
    created_at: Timestamp,
}

impl Booking {
    /// Creates a pending booking stamped with the current time.
    ///
    /// `booking_time` defaults to the creation time when absent.
    #[must_use]
    pub fn pending(
        user_id: impl Into<String>,
        service_id: ProviderId,
        pickup: Coordinate,
        destination: Coordinate,
        fare: u64,
        booking_time: Option<Timestamp>,
    ) -> Self {
        let created_at = Timestamp::now();
        Self {
            id: BookingId::new_v4(),
            user_id: user_id.into(),
            service_id,
            pickup,
            destination,
            fare,
            booking_time: booking_time.unwrap_or(created_at),
            status: BookingStatus::Pending,
            created_at,
        }
    }

    /// Returns the booking ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> BookingId {
        self.id
    }

    /// Returns the user who made the booking.
    #[inline]
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the booked provider.
    #[inline]
    #[must_use]
    pub fn service_id(&self) -> &ProviderId {
        &self.service_id
    }

    /// Returns the pickup point.
    #[inline]
    #[must_use]
    pub fn pickup(&self) -> &Coordinate {
        &self.pickup
    }

    /// Returns the destination.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> &Coordinate {
        &self.destination
    }

    /// Returns the quoted fare.
    #[inline]
    #[must_use]
    pub fn fare(&self) -> u64 {
        self.fare
    }

    /// Returns the requested ride time.
    #[inline]
    #[must_use]
    pub fn booking_time(&self) -> Timestamp {
        self.booking_time
    }

    /// Returns the status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> BookingStatus {
        self.status
    }

    /// Returns when the booking was recorded.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
