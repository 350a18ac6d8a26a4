//! # Fallback Pricing Model
//!
//! Deterministic local formula used whenever a live source is missing,
//! failing or unusable:
//!
//! ```text
//! fare = round(base_price * surge + distance_km * per_km_rate * surge)
//! ```
//!
//! `base_price` and `per_km_rate` come from the provider's static
//! configuration; `surge` is sampled from the [`SurgeCalculator`] at the
//! moment of the call.

use crate::domain::entities::provider::{ProviderConfig, ProviderRegistry};
use crate::domain::errors::DomainResult;
use crate::domain::services::clock::Clock;
use crate::domain::services::surge::SurgeCalculator;
use crate::domain::value_objects::ProviderId;
use std::sync::Arc;

/// Prices a trip from distance and surge alone.
#[derive(Debug, Clone)]
pub struct FallbackPricingModel {
    registry: Arc<ProviderRegistry>,
    surge: Arc<SurgeCalculator>,
    clock: Arc<dyn Clock>,
}

impl FallbackPricingModel {
    /// Creates a model over the given providers.
    #[must_use]
    pub fn new(
        registry: Arc<ProviderRegistry>,
        surge: Arc<SurgeCalculator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            surge,
            clock,
        }
    }

    /// Computes the fallback fare for `provider_id` with a freshly sampled surge.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownProvider`](crate::domain::errors::DomainError::UnknownProvider)
    /// if the id is not registered. That is a wiring defect, not a
    /// recoverable runtime condition.
    pub fn fallback_fare(&self, provider_id: &ProviderId, distance_km: f64) -> DomainResult<u64> {
        let provider = self.registry.get(provider_id)?;
        let surge = self.surge.multiplier(provider_id, self.clock.now());
        Ok(fare_with_surge(provider, distance_km, surge))
    }

    /// Returns the provider registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }
}

/// Applies the fallback formula with an explicit surge value.
///
/// Negative or non-finite distances are treated as zero.
#[must_use]
pub fn fare_with_surge(provider: &ProviderConfig, distance_km: f64, surge: f64) -> u64 {
    let distance_km = if distance_km.is_finite() {
        distance_km.max(0.0)
    } else {
        0.0
    };
    let base = provider.fallback_base_price() * surge;
    let per_distance = distance_km * provider.fallback_per_km_rate() * surge;
    let fare = (base + per_distance).round();

    if fare.is_finite() && fare > 0.0 {
        fare as u64
    } else {
        0
    }
}
