//! # Provider Entity
//!
//! Static configuration of a fare provider and the ordered registry of all
//! configured providers.
//!
//! Provider configurations are loaded once at startup and never mutated. The
//! registry order is the "configuration order" that the aggregator walks when
//! it assembles estimates.
//!
//! # Examples
//!
//! ```
//! use fare_compare::domain::entities::provider::{ProviderConfig, ProviderRegistry};
//! use fare_compare::domain::value_objects::{ProviderId, VehicleType};
//!
//! let registry = ProviderRegistry::new(vec![
//!     ProviderConfig::new("metro", "Metro Cabs", 40.0, 11.0),
//!     ProviderConfig::new("zip", "Zip Bikes", 20.0, 5.0).with_vehicle_type(VehicleType::Bike),
//! ])
//! .unwrap();
//!
//! assert_eq!(registry.len(), 2);
//! assert!(registry.get(&ProviderId::new("zip")).is_ok());
//! assert!(registry.get(&ProviderId::new("lyft")).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{LiveSource, ProviderId, VehicleType};
use std::collections::HashSet;
use std::fmt;

/// Opaque credential handed to a live source.
///
/// The secret never appears in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Wraps an API key.
    #[must_use]
    pub fn api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// Returns the raw secret for building request headers.
    #[inline]
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Static configuration of one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    id: ProviderId,
    display_name: String,
    fallback_base_price: f64,
    fallback_per_km_rate: f64,
    vehicle_type: VehicleType,
    live_source: LiveSource,
    endpoint: Option<String>,
    credentials: Option<Credentials>,
}

impl ProviderConfig {
    /// Creates a fallback-only provider configuration.
    #[must_use]
    pub fn new(
        id: impl Into<ProviderId>,
        display_name: impl Into<String>,
        fallback_base_price: f64,
        fallback_per_km_rate: f64,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            fallback_base_price,
            fallback_per_km_rate,
            vehicle_type: VehicleType::Car,
            live_source: LiveSource::None,
            endpoint: None,
            credentials: None,
        }
    }

    /// Sets the vehicle type.
    #[must_use]
    pub fn with_vehicle_type(mut self, vehicle_type: VehicleType) -> Self {
        self.vehicle_type = vehicle_type;
        self
    }

    /// Sets the live source and its endpoint (API base URL or page URL).
    #[must_use]
    pub fn with_live_source(mut self, live_source: LiveSource, endpoint: impl Into<String>) -> Self {
        self.live_source = live_source;
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Checks prices and that a live source has somewhere to go.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProviderConfig`] describing the defect.
    pub fn validate(&self) -> DomainResult<()> {
        if self.id.as_str().is_empty() {
            return Err(DomainError::invalid_provider_config("empty provider id"));
        }
        for (name, value) in [
            ("fallback_base_price", self.fallback_base_price),
            ("fallback_per_km_rate", self.fallback_per_km_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::invalid_provider_config(format!(
                    "{}: {} must be a non-negative number, got {}",
                    self.id, name, value
                )));
            }
        }
        if self.live_source.is_live() && self.endpoint.is_none() {
            return Err(DomainError::invalid_provider_config(format!(
                "{}: live source {} needs an endpoint",
                self.id, self.live_source
            )));
        }
        Ok(())
    }

    /// Returns the provider ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ProviderId {
        &self.id
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the fallback base price.
    #[inline]
    #[must_use]
    pub fn fallback_base_price(&self) -> f64 {
        self.fallback_base_price
    }

    /// Returns the fallback per-kilometre rate.
    #[inline]
    #[must_use]
    pub fn fallback_per_km_rate(&self) -> f64 {
        self.fallback_per_km_rate
    }

    /// Returns the vehicle type.
    #[inline]
    #[must_use]
    pub fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    /// Returns the live source.
    #[inline]
    #[must_use]
    pub fn live_source(&self) -> LiveSource {
        self.live_source
    }

    /// Returns the endpoint, if any.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Returns the credentials, if any.
    #[inline]
    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}

/// Ordered, immutable set of provider configurations.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
}

impl ProviderRegistry {
    /// Creates a registry, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProviderConfig`] if the list is empty,
    /// an id is repeated, or any configuration fails validation.
    pub fn new(providers: Vec<ProviderConfig>) -> DomainResult<Self> {
        if providers.is_empty() {
            return Err(DomainError::invalid_provider_config(
                "at least one provider is required",
            ));
        }

        let mut seen = HashSet::with_capacity(providers.len());
        for provider in &providers {
            provider.validate()?;
            if !seen.insert(provider.id().clone()) {
                return Err(DomainError::invalid_provider_config(format!(
                    "duplicate provider id: {}",
                    provider.id()
                )));
            }
        }

        Ok(Self { providers })
    }

    /// The four stock providers with their published fallback rates and
    /// no credentials.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            providers: vec![
                ProviderConfig::new("uber", "Uber", 50.0, 12.0).with_live_source(
                    LiveSource::UberApi,
                    "https://api.uber.com/v1.2/estimates/price",
                ),
                ProviderConfig::new("ola", "Ola", 45.0, 10.0)
                    .with_live_source(LiveSource::OlaApi, "https://devapi.olacabs.com/v1/products"),
                ProviderConfig::new("rapido", "Rapido", 35.0, 8.0)
                    .with_vehicle_type(VehicleType::Bike)
                    .with_live_source(
                        LiveSource::RapidoScrape,
                        "https://rapido.bike/fare-calculator",
                    ),
                ProviderConfig::new("blusmart", "BluSmart", 60.0, 15.0),
            ],
        }
    }

    /// Looks up a provider.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownProvider`] if no provider has that id.
    pub fn get(&self, id: &ProviderId) -> DomainResult<&ProviderConfig> {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| DomainError::UnknownProvider(id.clone()))
    }

    /// Returns true if a provider with that id is registered.
    #[must_use]
    pub fn contains(&self, id: &ProviderId) -> bool {
        self.providers.iter().any(|p| p.id() == id)
    }

    /// Iterates providers in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter()
    }

    /// Returns the number of providers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if there are no providers. Never true for a constructed registry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod config {
        use super::*;

        #[test]
        fn new_is_fallback_only_car() {
            let cfg = ProviderConfig::new("metro", "Metro", 40.0, 9.5);
            assert_eq!(cfg.live_source(), LiveSource::None);
            assert_eq!(cfg.vehicle_type(), VehicleType::Car);
            assert!(cfg.endpoint().is_none());
            assert!(cfg.validate().is_ok());
        }

        #[test]
        fn negative_rate_is_rejected() {
            let cfg = ProviderConfig::new("metro", "Metro", 40.0, -1.0);
            assert!(matches!(
                cfg.validate(),
                Err(DomainError::InvalidProviderConfig(_))
            ));
        }

        #[test]
        fn credentials_are_redacted_in_debug() {
            let cfg = ProviderConfig::new("uber", "Uber", 50.0, 12.0)
                .with_credentials(Credentials::api_key("s3cr3t"));
            let debug = format!("{:?}", cfg);
            assert!(!debug.contains("s3cr3t"));
            assert!(debug.contains("redacted"));
            assert_eq!(cfg.credentials().unwrap().secret(), "s3cr3t");
        }
    }

    mod registry {
        use super::*;

        #[test]
        fn defaults_keep_configuration_order() {
            let registry = ProviderRegistry::defaults();
            let ids: Vec<&str> = registry.iter().map(|p| p.id().as_str()).collect();
            assert_eq!(ids, vec!["uber", "ola", "rapido", "blusmart"]);
            assert_eq!(
                registry
                    .get(&ProviderId::new("rapido"))
                    .unwrap()
                    .vehicle_type(),
                VehicleType::Bike
            );
        }

        #[test]
        fn duplicate_ids_are_rejected() {
            let result = ProviderRegistry::new(vec![
                ProviderConfig::new("a", "A", 1.0, 1.0),
                ProviderConfig::new("a", "A again", 2.0, 2.0),
            ]);
            assert!(result.is_err());
        }

        #[test]
        fn empty_registry_is_rejected() {
            assert!(ProviderRegistry::new(vec![]).is_err());
        }

        #[test]
        fn unknown_lookup_is_a_defect() {
            let registry = ProviderRegistry::defaults();
            let err = registry.get(&ProviderId::new("lyft")).unwrap_err();
            assert_eq!(err, DomainError::UnknownProvider(ProviderId::new("lyft")));
        }

        #[test]
        fn live_source_without_endpoint_is_rejected() {
            let mut cfg = ProviderConfig::new("ola", "Ola", 45.0, 10.0);
            cfg.live_source = LiveSource::OlaApi;
            assert!(ProviderRegistry::new(vec![cfg]).is_err());
        }
    }
}
