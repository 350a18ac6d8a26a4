//! # Bootstrap
//!
//! Builds the running service from [`Settings`]: provider registry, live
//! sources, result cache, aggregation engine, booking store and router.

use crate::api::rest::{AppState, create_router};
use crate::application::services::{AggregationError, FareAggregationEngine};
use crate::config::{ConfigError, DEFAULT_API_TIMEOUT_MS, Settings};
use crate::domain::entities::ProviderConfig;
use crate::domain::services::clock::{Clock, SystemClock};
use crate::domain::services::fallback::FallbackPricingModel;
use crate::domain::services::random::{RandomSource, ThreadRandom};
use crate::domain::services::surge::SurgeCalculator;
use crate::domain::value_objects::LiveSource;
use crate::infrastructure::cache::FareCache;
use crate::infrastructure::persistence::in_memory::InMemoryBookingRepository;
use crate::infrastructure::providers::scrape::{HttpPageSessionFactory, PageSessionFactory};
use crate::infrastructure::providers::{
    FareSource, OlaApiSource, ProviderError, RapidoScraper, UberApiSource,
};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Startup failures.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Settings are unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A live source could not be constructed.
    #[error("failed to build live source: {0}")]
    Provider(#[from] ProviderError),

    /// A live source does not match the registry.
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// Shared collaborators, replaceable in tests.
#[derive(Debug, Clone)]
pub struct Runtime {
    /// Time source for surge and cache expiry.
    pub clock: Arc<dyn Clock>,
    /// Randomness for surge variance and ETA jitter.
    pub random: Arc<dyn RandomSource>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock::new()),
            random: Arc::new(ThreadRandom::new()),
        }
    }
}

/// Resolves credentials from the process environment.
#[must_use]
pub fn env_credentials(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Builds the aggregation engine with one live source per configured provider.
///
/// # Errors
///
/// Returns [`BootstrapError`] if settings are invalid or a source cannot be built.
pub fn build_engine<F>(
    settings: &Settings,
    runtime: Runtime,
    lookup: F,
) -> Result<FareAggregationEngine, BootstrapError>
where
    F: Fn(&str) -> Option<String>,
{
    let registry = Arc::new(settings.registry(&lookup)?);
    let surge = Arc::new(SurgeCalculator::new(
        settings.surge.clone(),
        runtime.random.clone(),
    ));
    let fallback = Arc::new(FallbackPricingModel::new(
        registry.clone(),
        surge.clone(),
        runtime.clock.clone(),
    ));
    let cache = Arc::new(FareCache::new(runtime.clock.clone(), settings.cache.ttl_secs));
    let sessions: Arc<dyn PageSessionFactory> = Arc::new(
        HttpPageSessionFactory::new(
            settings.scrape.navigation_timeout_ms,
            settings.scrape.user_agent.clone(),
        )
        .with_poll_interval(Duration::from_millis(settings.scrape.poll_interval_ms)),
    );

    let mut engine = FareAggregationEngine::new(
        fallback,
        surge,
        cache,
        runtime.clock,
        runtime.random,
        settings.aggregation.clone(),
    );

    for provider in registry.iter() {
        let Some(source) = live_source(settings, provider, &sessions)? else {
            info!(provider = %provider.id(), "no live source, fallback pricing only");
            continue;
        };
        if provider.live_source() != LiveSource::RapidoScrape && provider.credentials().is_none() {
            warn!(provider = %provider.id(), "no API credential, live calls will fall back");
        }
        info!(provider = %provider.id(), source = %provider.live_source(), "live source attached");
        engine = engine.with_source(source)?;
    }

    Ok(engine)
}

fn live_source(
    settings: &Settings,
    provider: &ProviderConfig,
    sessions: &Arc<dyn PageSessionFactory>,
) -> Result<Option<Arc<dyn FareSource>>, BootstrapError> {
    let api_timeout_ms = settings
        .provider(provider.id().as_str())
        .map_or(DEFAULT_API_TIMEOUT_MS, |p| p.api_timeout_ms);

    let source: Arc<dyn FareSource> = match provider.live_source() {
        LiveSource::UberApi => Arc::new(UberApiSource::from_config(provider, api_timeout_ms)?),
        LiveSource::OlaApi => Arc::new(OlaApiSource::from_config(provider, api_timeout_ms)?),
        LiveSource::RapidoScrape => Arc::new(RapidoScraper::from_config(
            provider,
            sessions.clone(),
            settings.scrape.clone(),
        )?),
        LiveSource::None => return Ok(None),
    };
    Ok(Some(source))
}

/// Builds handler state with an empty in-memory booking store.
///
/// # Errors
///
/// Returns [`BootstrapError`] if the engine cannot be built.
pub fn build_state<F>(
    settings: &Settings,
    runtime: Runtime,
    lookup: F,
) -> Result<AppState, BootstrapError>
where
    F: Fn(&str) -> Option<String>,
{
    let engine = build_engine(settings, runtime, lookup)?;
    Ok(AppState {
        engine: Arc::new(engine),
        bookings: Arc::new(InMemoryBookingRepository::new()),
    })
}

/// Builds the HTTP router for the process, reading credentials from the environment.
///
/// # Errors
///
/// Returns [`BootstrapError`] if the engine cannot be built.
pub fn build_router(settings: &Settings) -> Result<Router, BootstrapError> {
    let state = build_state(settings, Runtime::default(), env_credentials)?;
    Ok(create_router(state))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::RouteRequest;
    use crate::domain::services::clock::ManualClock;
    use crate::domain::services::random::FixedRandom;
    use crate::domain::value_objects::{Coordinate, DataSource};
    use chrono::{FixedOffset, TimeZone};

    fn settings() -> Settings {
        let mut settings = Settings::load(None).unwrap();
        // Point every live source at a closed local port so calls fail fast.
        for provider in &mut settings.providers {
            if provider.endpoint.is_some() {
                provider.endpoint = Some("http://127.0.0.1:9/".to_string());
                provider.api_timeout_ms = 500;
            }
        }
        settings.scrape.navigation_timeout_ms = 500;
        settings.scrape.element_timeout_ms = 100;
        settings
    }

    fn runtime() -> Runtime {
        let ist = FixedOffset::east_opt(19_800).unwrap();
        Runtime {
            clock: Arc::new(ManualClock::new(
                ist.with_ymd_and_hms(2024, 3, 5, 13, 0, 0).unwrap(),
            )),
            random: Arc::new(FixedRandom::new(0.5)),
        }
    }

    #[test]
    fn live_sources_follow_settings() {
        let engine = build_engine(&settings(), runtime(), |_| None).unwrap();
        assert_eq!(engine.registry().len(), 4);
        assert_eq!(engine.live_source_count(), 3);
    }

    #[tokio::test]
    async fn unreachable_sources_fall_back() {
        let engine = build_engine(&settings(), runtime(), |_| Some("token".to_string())).unwrap();
        let route = RouteRequest::new(
            Coordinate::new(12.9716, 77.5946).unwrap(),
            Coordinate::new(12.2958, 76.6394).unwrap(),
            150.0,
            10_800.0,
        )
        .unwrap();

        let estimates = engine.get_all_fare_estimates(&route).await.unwrap();
        assert_eq!(estimates.len(), 4);
        assert!(estimates.iter().all(|e| e.data_source == DataSource::Estimated));
        let ids: Vec<_> = estimates.iter().map(|e| e.provider_id.as_str()).collect();
        assert_eq!(ids, ["rapido", "ola", "uber", "blusmart"]);
    }

    #[test]
    fn unset_credential_is_none() {
        assert_eq!(env_credentials("FARE_COMPARE_TEST_UNSET_VARIABLE"), None);
    }
}
