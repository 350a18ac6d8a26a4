//! # Fare Aggregation Engine
//!
//! Concurrent fan-out over every configured provider.
//!
//! One task is spawned per provider with a live source; providers without
//! one are priced directly by the fallback model. All tasks are awaited
//! regardless of outcome, so a slow or failing provider never cancels its
//! siblings. A task that fails, panics or overruns the per-provider guard is
//! priced by the fallback model. The assembled estimates are sorted by fare,
//! ties keeping configuration order.

use crate::domain::entities::{FareEstimate, ProviderRegistry, RouteRequest};
use crate::domain::errors::DomainError;
use crate::domain::services::clock::Clock;
use crate::domain::services::fallback::FallbackPricingModel;
use crate::domain::services::random::RandomSource;
use crate::domain::services::surge::SurgeCalculator;
use crate::domain::value_objects::{ProviderFare, ProviderId};
use crate::infrastructure::cache::{CacheStats, FareCache};
use crate::infrastructure::providers::adapter::ResilientFareAdapter;
use crate::infrastructure::providers::traits::FareSource;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Configuration for fare aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Guard timeout per provider task in milliseconds, above the sources' own bounds.
    pub per_provider_timeout_ms: u64,
    /// Largest ETA jitter in minutes.
    pub eta_jitter_max: u32,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            per_provider_timeout_ms: 30_000,
            eta_jitter_max: 4,
        }
    }
}

impl AggregationConfig {
    /// Sets the per-provider guard timeout.
    #[must_use]
    pub fn with_per_provider_timeout(mut self, timeout_ms: u64) -> Self {
        self.per_provider_timeout_ms = timeout_ms;
        self
    }

    /// Sets the largest ETA jitter.
    #[must_use]
    pub fn with_eta_jitter_max(mut self, eta_jitter_max: u32) -> Self {
        self.eta_jitter_max = eta_jitter_max;
        self
    }
}

/// Error type for aggregation operations.
///
/// Live-source failures never show up here; only wiring defects do.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationError {
    /// A provider id has no registered configuration.
    Configuration(DomainError),
}

impl fmt::Display for AggregationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "aggregation configuration defect: {}", e),
        }
    }
}

impl std::error::Error for AggregationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
        }
    }
}

impl From<DomainError> for AggregationError {
    fn from(error: DomainError) -> Self {
        Self::Configuration(error)
    }
}

/// Result type for aggregation operations.
pub type AggregationResult<T> = Result<T, AggregationError>;

/// Engine producing one ranked estimate per configured provider.
#[derive(Debug)]
pub struct FareAggregationEngine {
    registry: Arc<ProviderRegistry>,
    adapters: HashMap<ProviderId, ResilientFareAdapter>,
    fallback: Arc<FallbackPricingModel>,
    surge: Arc<SurgeCalculator>,
    cache: Arc<FareCache>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    config: AggregationConfig,
}

impl FareAggregationEngine {
    /// Creates an engine over the fallback model's providers, with no live sources yet.
    #[must_use]
    pub fn new(
        fallback: Arc<FallbackPricingModel>,
        surge: Arc<SurgeCalculator>,
        cache: Arc<FareCache>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        config: AggregationConfig,
    ) -> Self {
        Self {
            registry: fallback.registry().clone(),
            adapters: HashMap::new(),
            fallback,
            surge,
            cache,
            clock,
            random,
            config,
        }
    }

    /// Attaches a live source, wrapped in a [`ResilientFareAdapter`].
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::Configuration`] if the source's provider
    /// is not registered.
    pub fn with_source(mut self, source: Arc<dyn FareSource>) -> AggregationResult<Self> {
        let id = source.provider_id().clone();
        self.registry.get(&id)?;

        let adapter = ResilientFareAdapter::new(source, self.fallback.clone(), self.cache.clone());
        self.adapters.insert(id, adapter);
        Ok(self)
    }

    /// Returns one estimate per configured provider, cheapest first.
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::Configuration`] on a wiring defect. Live
    /// source failures are absorbed by the fallback model.
    pub async fn get_all_fare_estimates(
        &self,
        route: &RouteRequest,
    ) -> AggregationResult<Vec<FareEstimate>> {
        let settled = self.settle_all(route).await?;

        let last_updated = self.clock.timestamp();
        let duration_minutes = route.duration_minutes();
        let mut estimates = Vec::with_capacity(settled.len());

        for (id, fare) in settled {
            let provider = self.registry.get(&id)?;
            let surge = self.surge.multiplier(&id, self.clock.now());
            let eta = duration_minutes.saturating_add(self.eta_jitter());

            estimates.push(
                FareEstimate::for_provider(provider, fare.amount(), fare.source())
                    .with_eta_minutes(eta)
                    .with_route(route.distance_km(), duration_minutes)
                    .with_surge_multiplier(surge)
                    .with_last_updated(last_updated),
            );
        }

        estimates.sort_by_key(|estimate| estimate.estimated_fare);

        debug!(
            providers = estimates.len(),
            live = estimates.iter().filter(|e| e.is_live()).count(),
            "fare aggregation complete"
        );
        Ok(estimates)
    }

    /// Runs every provider's retrieval and waits for all of them.
    async fn settle_all(
        &self,
        route: &RouteRequest,
    ) -> AggregationResult<Vec<(ProviderId, ProviderFare)>> {
        let guard = Duration::from_millis(self.config.per_provider_timeout_ms);
        let ids: Vec<ProviderId> = self.registry.iter().map(|p| p.id().clone()).collect();

        let retrievals = ids.iter().map(|id| {
            let handle = self.adapters.get(id).map(|adapter| {
                let adapter = adapter.clone();
                let route = route.clone();
                tokio::spawn(async move { timeout(guard, adapter.fetch_fare(&route)).await })
            });
            async move {
                match handle {
                    Some(handle) => Some(handle.await),
                    None => None,
                }
            }
        });
        let outcomes = join_all(retrievals).await;

        let mut settled = Vec::with_capacity(ids.len());

        for (id, outcome) in ids.into_iter().zip(outcomes) {
            let fare = match outcome {
                None => self.fallback_fare(&id, route)?,
                Some(Ok(Ok(Ok(fare)))) => fare,
                Some(Ok(Ok(Err(e)))) => return Err(AggregationError::Configuration(e)),
                Some(Ok(Err(_))) => {
                    warn!(
                        provider = %id,
                        timeout_ms = self.config.per_provider_timeout_ms,
                        "provider retrieval overran guard, using fallback"
                    );
                    self.fallback_fare(&id, route)?
                }
                Some(Err(e)) => {
                    warn!(provider = %id, error = %e, "provider task failed, using fallback");
                    self.fallback_fare(&id, route)?
                }
            };

            debug!(provider = %id, fare = %fare, "provider settled");
            settled.push((id, fare));
        }

        Ok(settled)
    }

    fn fallback_fare(
        &self,
        id: &ProviderId,
        route: &RouteRequest,
    ) -> AggregationResult<ProviderFare> {
        let amount = self.fallback.fallback_fare(id, route.distance_km())?;
        Ok(ProviderFare::estimated(amount))
    }

    fn eta_jitter(&self) -> u32 {
        let max = self.config.eta_jitter_max;
        let jitter = (self.random.next_unit() * f64::from(max.saturating_add(1))).floor();
        if jitter.is_finite() && jitter > 0.0 {
            (jitter as u32).min(max)
        } else {
            0
        }
    }

    /// Drops every cached fare.
    pub fn cache_clear(&self) {
        self.cache.clear();
        info!("fare cache cleared");
    }

    /// Returns cache keys and counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Removes expired cache entries eagerly.
    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired()
    }

    /// Returns the provider registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Returns how many providers have a live source attached.
    #[inline]
    #[must_use]
    pub fn live_source_count(&self) -> usize {
        self.adapters.len()
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }
}
