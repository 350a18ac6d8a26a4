//! # Route Request
//!
//! A pickup/destination pair with advisory distance and duration.
//!
//! Distance and duration are taken at face value: nothing checks them
//! against the coordinates.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::Coordinate;
use serde::{Deserialize, Serialize};

/// A request to price one route across all providers.
///
/// # Invariants
///
/// - `distance_km > 0`
/// - `duration_sec >= 0`
///
/// # Examples
///
/// ```
/// use fare_compare::domain::entities::route::RouteRequest;
/// use fare_compare::domain::value_objects::Coordinate;
///
/// let route = RouteRequest::new(
///     Coordinate::new(12.9716, 77.5946).unwrap(),
///     Coordinate::new(12.2958, 76.6394).unwrap(),
///     150.0,
///     10800.0,
/// )
/// .unwrap();
///
/// assert_eq!(route.duration_minutes(), 180);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RouteRequestFields")]
pub struct RouteRequest {
    pickup: Coordinate,
    destination: Coordinate,
    distance_km: f64,
    duration_sec: f64,
}

/// Unchecked wire form, validated through [`RouteRequest::new`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteRequestFields {
    pickup: Coordinate,
    destination: Coordinate,
    distance_km: f64,
    duration_sec: f64,
}

impl TryFrom<RouteRequestFields> for RouteRequest {
    type Error = DomainError;

    fn try_from(fields: RouteRequestFields) -> DomainResult<Self> {
        Self::new(
            fields.pickup,
            fields.destination,
            fields.distance_km,
            fields.duration_sec,
        )
    }
}

impl RouteRequest {
    /// Creates a validated route request.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRoute`] if the distance is not positive
    /// or the duration is negative, and [`DomainError::InvalidCoordinate`]
    /// if either endpoint is out of range.
    pub fn new(
        pickup: Coordinate,
        destination: Coordinate,
        distance_km: f64,
        duration_sec: f64,
    ) -> DomainResult<Self> {
        pickup.validate()?;
        destination.validate()?;

        if !distance_km.is_finite() || distance_km <= 0.0 {
            return Err(DomainError::invalid_route(format!(
                "distance must be positive, got {}",
                distance_km
            )));
        }
        if !duration_sec.is_finite() || duration_sec < 0.0 {
            return Err(DomainError::invalid_route(format!(
                "duration must not be negative, got {}",
                duration_sec
            )));
        }

        Ok(Self {
            pickup,
            destination,
            distance_km,
            duration_sec,
        })
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

    /// Returns the distance in kilometres.
    #[inline]
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Returns the duration in seconds.
    #[inline]
    #[must_use]
    pub fn duration_sec(&self) -> f64 {
        self.duration_sec
    }

    /// Duration rounded to whole minutes.
    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        let minutes = (self.duration_sec / 60.0).round();
        if minutes >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            minutes as u32
        }
    }
}
