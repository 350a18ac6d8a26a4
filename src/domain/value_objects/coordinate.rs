//! # Coordinate Value Object
//!
//! A geographic point with an optional human-readable address.
//!
//! Coordinates are immutable once constructed. Two coordinates with the same
//! latitude and longitude render the same [`Coordinate::fingerprint`], which
//! is what the result cache keys on.
//!
//! # Examples
//!
//! ```
//! use fare_compare::domain::value_objects::coordinate::Coordinate;
//!
//! let bengaluru = Coordinate::new(12.9716, 77.5946)
//!     .unwrap()
//!     .with_address("Bengaluru");
//!
//! assert_eq!(bengaluru.fingerprint(), "12.9716_77.5946");
//! assert_eq!(bengaluru.address(), Some("Bengaluru"));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel rendered for a coordinate that is absent altogether.
pub const MISSING_COORDINATE: &str = "nil";

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

impl Coordinate {
    /// Creates a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCoordinate`] if either component is not
    /// finite or lies outside the valid latitude/longitude range.
    pub fn new(lat: f64, lng: f64) -> DomainResult<Self> {
        let coordinate = Self {
            lat,
            lng,
            address: None,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Attaches a human-readable address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Checks the latitude/longitude ranges.
    ///
    /// Deserialized coordinates bypass [`Coordinate::new`], so request
    /// handlers call this explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCoordinate`] on out-of-range components.
    pub fn validate(&self) -> DomainResult<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(DomainError::InvalidCoordinate(format!(
                "latitude {} out of range",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(DomainError::InvalidCoordinate(format!(
                "longitude {} out of range",
                self.lng
            )));
        }
        Ok(())
    }

    /// Returns the latitude.
    #[inline]
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Returns the longitude.
    #[inline]
    #[must_use]
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Returns the address, if any.
    #[inline]
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Renders `lat_lng` for cache keys.
    ///
    /// Uses the shortest decimal that round-trips, so equal values always
    /// render identically. Negative zero renders as `0`. The address does
    /// not participate.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        format!("{}_{}", self.lat + 0.0, self.lng + 0.0)
    }
}

/// Fingerprint of a possibly absent coordinate.
#[must_use]
pub fn fingerprint_of(coordinate: Option<&Coordinate>) -> String {
    coordinate.map_or_else(|| MISSING_COORDINATE.to_string(), Coordinate::fingerprint)
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            Some(address) => write!(f, "{} ({}, {})", address, self.lat, self.lng),
            None => write!(f, "({}, {})", self.lat, self.lng),
        }
    }
}
