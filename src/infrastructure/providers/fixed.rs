//! # Fixed Fare Source
//!
//! A [`FareSource`] with a scripted outcome, for tests and benchmarks.
//!
//! # Examples
//!
//! ```
//! use fare_compare::infrastructure::providers::fixed::FixedFareSource;
//! use fare_compare::infrastructure::providers::traits::{FareSource, RawFare};
//!
//! let source = FixedFareSource::text("uber", "₹240-260");
//! assert_eq!(source.provider_id().as_str(), "uber");
//! assert_eq!(source.calls(), 0);
//! ```

use crate::domain::entities::RouteRequest;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::traits::{FareSource, RawFare};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Fare source that always answers the same way.
#[derive(Debug)]
pub struct FixedFareSource {
    provider_id: ProviderId,
    outcome: Result<RawFare, ProviderError>,
    delay: Duration,
    timeout_ms: u64,
    calls: AtomicUsize,
}

impl FixedFareSource {
    /// Source answering `outcome`.
    #[must_use]
    pub fn new(provider_id: impl Into<ProviderId>, outcome: Result<RawFare, ProviderError>) -> Self {
        Self {
            provider_id: provider_id.into(),
            outcome,
            delay: Duration::ZERO,
            timeout_ms: 5_000,
            calls: AtomicUsize::new(0),
        }
    }

    /// Source answering with a number.
    #[must_use]
    pub fn number(provider_id: impl Into<ProviderId>, fare: f64) -> Self {
        Self::new(provider_id, Ok(RawFare::Number(fare)))
    }

    /// Source answering with text.
    #[must_use]
    pub fn text(provider_id: impl Into<ProviderId>, fare: impl Into<String>) -> Self {
        Self::new(provider_id, Ok(RawFare::Text(fare.into())))
    }

    /// Source that always fails with `error`.
    #[must_use]
    pub fn failing(provider_id: impl Into<ProviderId>, error: ProviderError) -> Self {
        Self::new(provider_id, Err(error))
    }

    /// Delays every answer.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the advertised retrieval bound.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns how many times the source was asked.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FareSource for FixedFareSource {
    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    async fn fetch_raw(&self, _route: &RouteRequest) -> ProviderResult<RawFare> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}
