//! # Resilient Fare Adapter
//!
//! Wraps one [`FareSource`] with the uniform retrieval policy:
//!
//! 1. Return the cached fare for the route if there is one.
//! 2. Otherwise ask the live source, bounded by its own timeout.
//! 3. Parse the raw answer into a whole-unit fare.
//! 4. On any failure, or if nothing usable was parsed, price with the
//!    fallback model.
//! 5. Cache whatever was obtained, live or fallback, before returning.
//!
//! Live-source failures are logged and absorbed. The only error this adapter
//! returns is a configuration defect from the fallback model.

use crate::domain::entities::RouteRequest;
use crate::domain::errors::DomainResult;
use crate::domain::services::fallback::FallbackPricingModel;
use crate::domain::value_objects::{ProviderFare, ProviderId};
use crate::infrastructure::cache::{FareCache, fare_cache_key};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::parse::parse_fare;
use crate::infrastructure::providers::traits::FareSource;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cache-first, fallback-backed access to one live fare source.
#[derive(Debug, Clone)]
pub struct ResilientFareAdapter {
    source: Arc<dyn FareSource>,
    fallback: Arc<FallbackPricingModel>,
    cache: Arc<FareCache>,
}

impl ResilientFareAdapter {
    /// Creates an adapter caching with the cache's default TTL.
    #[must_use]
    pub fn new(
        source: Arc<dyn FareSource>,
        fallback: Arc<FallbackPricingModel>,
        cache: Arc<FareCache>,
    ) -> Self {
        Self {
            source,
            fallback,
            cache,
        }
    }

    /// Returns the provider this adapter prices for.
    #[inline]
    #[must_use]
    pub fn provider_id(&self) -> &ProviderId {
        self.source.provider_id()
    }

    /// Returns the fare for `route`, from cache, live source or fallback.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownProvider`](crate::domain::errors::DomainError::UnknownProvider)
    /// if the source's provider is not registered with the fallback model.
    pub async fn fetch_fare(&self, route: &RouteRequest) -> DomainResult<ProviderFare> {
        let provider_id = self.provider_id();
        let key = fare_cache_key(provider_id, Some(route.pickup()), Some(route.destination()));

        if let Some(cached) = self.cache.get(&key) {
            debug!(provider = %provider_id, key = %key, fare = %cached, "fare cache hit");
            return Ok(cached);
        }
        debug!(provider = %provider_id, key = %key, "fare cache miss");

        let fare = match self.fetch_live(route).await {
            Ok(amount) => ProviderFare::live(amount),
            Err(e) => {
                warn!(
                    provider = %provider_id,
                    error = %e,
                    structural = e.is_structural(),
                    "live fare unavailable, using fallback"
                );
                let amount = self
                    .fallback
                    .fallback_fare(provider_id, route.distance_km())?;
                ProviderFare::estimated(amount)
            }
        };

        self.cache.set_default(key, fare);
        Ok(fare)
    }

    async fn fetch_live(&self, route: &RouteRequest) -> ProviderResult<u64> {
        let timeout_ms = self.source.timeout_ms();
        let raw = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.source.fetch_raw(route),
        )
        .await
        .map_err(|_| ProviderError::timeout_with_duration("live fare timed out", timeout_ms))??;

        parse_fare(&raw)
            .ok_or_else(|| ProviderError::unusable_payload(format!("no fare in {}", raw)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::ProviderRegistry;
    use crate::domain::services::clock::{Clock, ManualClock};
    use crate::domain::services::random::FixedRandom;
    use crate::domain::services::surge::{SurgeCalculator, SurgeConfig};
    use crate::domain::value_objects::{Coordinate, DataSource};
    use crate::infrastructure::cache::DEFAULT_TTL_SECS;
    use crate::infrastructure::providers::fixed::FixedFareSource;
    use chrono::{FixedOffset, TimeZone};

    struct Fixture {
        clock: Arc<ManualClock>,
        cache: Arc<FareCache>,
        fallback: Arc<FallbackPricingModel>,
    }

    impl Fixture {
        fn new() -> Self {
            let ist = FixedOffset::east_opt(19_800).unwrap();
            // Tuesday, off-peak
            let clock = Arc::new(ManualClock::new(
                ist.with_ymd_and_hms(2024, 3, 5, 13, 0, 0).unwrap(),
            ));
            let dyn_clock: Arc<dyn Clock> = clock.clone();
            let surge = Arc::new(SurgeCalculator::new(
                SurgeConfig::default(),
                Arc::new(FixedRandom::new(0.5)),
            ));
            let fallback = Arc::new(FallbackPricingModel::new(
                Arc::new(ProviderRegistry::defaults()),
                surge,
                dyn_clock.clone(),
            ));
            Self {
                clock,
                cache: Arc::new(FareCache::new(dyn_clock, DEFAULT_TTL_SECS)),
                fallback,
            }
        }

        fn adapter(&self, source: Arc<FixedFareSource>) -> ResilientFareAdapter {
            ResilientFareAdapter::new(source, self.fallback.clone(), self.cache.clone())
        }
    }

    fn route() -> RouteRequest {
        RouteRequest::new(
            Coordinate::new(12.9716, 77.5946).unwrap(),
            Coordinate::new(12.2958, 76.6394).unwrap(),
            150.0,
            10_800.0,
        )
        .unwrap()
    }

    mod live_path {
        use super::*;

        #[tokio::test]
        async fn live_fare_is_tagged_and_cached() {
            let fixture = Fixture::new();
            let source = Arc::new(FixedFareSource::text("uber", "₹2400-2600"));
            let adapter = fixture.adapter(source.clone());

            let fare = adapter.fetch_fare(&route()).await.unwrap();
            assert_eq!(fare, ProviderFare::live(2500));

            let again = adapter.fetch_fare(&route()).await.unwrap();
            assert_eq!(again, fare);
            assert_eq!(source.calls(), 1);
        }

        #[tokio::test]
        async fn expired_entry_is_refetched() {
            let fixture = Fixture::new();
            let source = Arc::new(FixedFareSource::number("ola", 1580.0));
            let adapter = fixture.adapter(source.clone());

            adapter.fetch_fare(&route()).await.unwrap();
            fixture.clock.advance_secs(1800);
            adapter.fetch_fare(&route()).await.unwrap();
            assert_eq!(source.calls(), 2);
        }
    }

    mod fallback_path {
        use super::*;

        #[tokio::test]
        async fn failure_uses_fallback_and_caches_it() {
            let fixture = Fixture::new();
            let source = Arc::new(FixedFareSource::failing(
                "uber",
                ProviderError::connection("refused"),
            ));
            let adapter = fixture.adapter(source.clone());

            let fare = adapter.fetch_fare(&route()).await.unwrap();
            // 50 + 150 * 12
            assert_eq!(fare, ProviderFare::estimated(1850));
            assert_eq!(fare.source(), DataSource::Estimated);

            let key = fare_cache_key(
                &ProviderId::new("uber"),
                Some(route().pickup()),
                Some(route().destination()),
            );
            assert_eq!(fixture.cache.get(&key), Some(fare));

            adapter.fetch_fare(&route()).await.unwrap();
            assert_eq!(source.calls(), 1);
        }

        #[tokio::test]
        async fn unusable_text_uses_fallback() {
            let fixture = Fixture::new();
            let adapter = fixture.adapter(Arc::new(FixedFareSource::text("ola", "Fare unavailable")));

            let fare = adapter.fetch_fare(&route()).await.unwrap();
            // 45 + 150 * 10
            assert_eq!(fare, ProviderFare::estimated(1545));
        }

        #[tokio::test]
        async fn slow_source_times_out_to_fallback() {
            let fixture = Fixture::new();
            let source = FixedFareSource::number("rapido", 900.0)
                .with_delay(Duration::from_secs(30))
                .with_timeout_ms(20);
            let adapter = fixture.adapter(Arc::new(source));

            let fare = adapter.fetch_fare(&route()).await.unwrap();
            assert_eq!(fare, ProviderFare::estimated(1235));
        }

        #[tokio::test]
        async fn unregistered_provider_is_a_defect() {
            let fixture = Fixture::new();
            let adapter = fixture.adapter(Arc::new(FixedFareSource::failing(
                "lyft",
                ProviderError::connection("refused"),
            )));
            assert!(adapter.fetch_fare(&route()).await.is_err());
        }
    }
}
