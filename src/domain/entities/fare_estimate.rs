//! # Fare Estimate
//!
//! The uniform output record produced for every configured provider.

use crate::domain::entities::provider::ProviderConfig;
use crate::domain::value_objects::{DataSource, ProviderId, Timestamp, VehicleType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized price estimate for one provider.
///
/// Serialized with camelCase field names for API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareEstimate {
    /// Provider identifier.
    pub provider_id: ProviderId,
    /// Human-readable provider name.
    pub display_name: String,
    /// Fare in whole currency units.
    pub estimated_fare: u64,
    /// Estimated time of arrival in minutes.
    pub eta_minutes: u32,
    /// Vehicle class.
    pub vehicle_type: VehicleType,
    /// Route distance, rounded to one decimal place.
    pub distance_km: f64,
    /// Route duration in whole minutes.
    pub duration_minutes: u32,
    /// Surge multiplier sampled when the record was assembled.
    pub surge_multiplier: f64,
    /// Whether the fare came from the provider's live path.
    pub data_source: DataSource,
    /// When the record was assembled.
    pub last_updated: Timestamp,
}

impl FareEstimate {
    /// Starts an estimate for `provider`, filling the provider-derived fields.
    #[must_use]
    pub fn for_provider(
        provider: &ProviderConfig,
        estimated_fare: u64,
        data_source: DataSource,
    ) -> Self {
        Self {
            provider_id: provider.id().clone(),
            display_name: provider.display_name().to_string(),
            estimated_fare,
            eta_minutes: 0,
            vehicle_type: provider.vehicle_type(),
            distance_km: 0.0,
            duration_minutes: 0,
            surge_multiplier: 1.0,
            data_source,
            last_updated: Timestamp::now(),
        }
    }

    /// Sets the ETA.
    #[must_use]
    pub fn with_eta_minutes(mut self, eta_minutes: u32) -> Self {
        self.eta_minutes = eta_minutes;
        self
    }

    /// Sets the route distance and duration.
    #[must_use]
    pub fn with_route(mut self, distance_km: f64, duration_minutes: u32) -> Self {
        self.distance_km = (distance_km * 10.0).round() / 10.0;
        self.duration_minutes = duration_minutes;
        self
    }

    /// Sets the reported surge multiplier.
    #[must_use]
    pub fn with_surge_multiplier(mut self, surge_multiplier: f64) -> Self {
        self.surge_multiplier = surge_multiplier;
        self
    }

    /// Sets the assembly time.
    #[must_use]
    pub fn with_last_updated(mut self, last_updated: Timestamp) -> Self {
        self.last_updated = last_updated;
        self
    }

    /// Returns true if the fare came from a live source.
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.data_source.is_live()
    }
}

impl fmt::Display for FareEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FareEstimate({} {} {} eta={}m surge={:.2}x)",
            self.provider_id,
            self.estimated_fare,
            self.data_source,
            self.eta_minutes,
            self.surge_multiplier
        )
    }
}
