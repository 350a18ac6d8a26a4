//! # Surge Calculator
//!
//! Derives a time-dependent fare multiplier.
//!
//! Starting from a base of `1.0`, the multiplier gains a peak-hour increment
//! when the local hour falls inside a peak window (both endpoints inclusive),
//! a weekend increment on Saturdays and Sundays, and a uniform perturbation in
//! `[-variance, +variance]`. The sum is clamped to `[min, max]`.
//!
//! Every call draws from the injected [`RandomSource`], so two calls for the
//! same provider and instant may legitimately disagree.
//!
//! # Examples
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use fare_compare::domain::services::random::FixedRandom;
//! use fare_compare::domain::services::surge::{SurgeCalculator, SurgeConfig};
//! use fare_compare::domain::value_objects::ProviderId;
//! use std::sync::Arc;
//!
//! let surge = SurgeCalculator::new(SurgeConfig::default(), Arc::new(FixedRandom::new(0.5)));
//! let ist = FixedOffset::east_opt(19_800).unwrap();
//!
//! // Saturday 09:00 is both peak and weekend.
//! let saturday_morning = ist.with_ymd_and_hms(2024, 3, 9, 9, 0, 0).unwrap();
//! let m = surge.multiplier(&ProviderId::new("uber"), saturday_morning);
//! assert!((m - 1.5).abs() < 1e-9);
//! ```

use crate::domain::services::random::RandomSource;
use crate::domain::value_objects::ProviderId;
use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Inclusive `[start_hour, end_hour]` window of elevated demand.
pub type PeakWindow = (u32, u32);

/// Tunables for the surge model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurgeConfig {
    /// Multiplier before any adjustment.
    pub base: f64,
    /// Added inside a peak window.
    pub peak_increment: f64,
    /// Added on Saturday and Sunday.
    pub weekend_increment: f64,
    /// Half-width of the uniform perturbation.
    pub variance: f64,
    /// Lower clamp.
    pub min: f64,
    /// Upper clamp.
    pub max: f64,
    /// Peak windows in local hours, endpoints inclusive.
    pub peak_windows: Vec<PeakWindow>,
}

impl Default for SurgeConfig {
    fn default() -> Self {
        Self {
            base: 1.0,
            peak_increment: 0.3,
            weekend_increment: 0.2,
            variance: 0.1,
            min: 0.8,
            max: 2.5,
            peak_windows: vec![(8, 10), (17, 20)],
        }
    }
}

impl SurgeConfig {
    /// Checks that the clamp range is usable.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let values = [
            self.base,
            self.peak_increment,
            self.weekend_increment,
            self.variance,
            self.min,
            self.max,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err("surge values must be finite".to_string());
        }
        if self.min > self.max {
            return Err(format!(
                "surge min {} exceeds max {}",
                self.min, self.max
            ));
        }
        if self.variance < 0.0 {
            return Err("surge variance must not be negative".to_string());
        }
        if let Some((start, end)) = self
            .peak_windows
            .iter()
            .find(|(start, end)| start > end || *end > 23)
        {
            return Err(format!("invalid peak window {}..={}", start, end));
        }
        Ok(())
    }
}

/// Computes surge multipliers from time of day, weekday and randomness.
#[derive(Debug, Clone)]
pub struct SurgeCalculator {
    config: SurgeConfig,
    random: Arc<dyn RandomSource>,
}

impl SurgeCalculator {
    /// Creates a calculator.
    #[must_use]
    pub fn new(config: SurgeConfig, random: Arc<dyn RandomSource>) -> Self {
        Self { config, random }
    }

    /// Returns the multiplier for `provider_id` at `now`, always within
    /// `[config.min, config.max]`.
    ///
    /// The provider does not currently influence the result; it is part of
    /// the contract so per-provider demand curves can be added without
    /// touching callers.
    #[must_use]
    pub fn multiplier(&self, provider_id: &ProviderId, now: DateTime<FixedOffset>) -> f64 {
        let perturbation = (self.random.next_unit() - 0.5) * 2.0 * self.config.variance;
        let raw = self.demand_component(now) + perturbation;
        let clamped = raw.max(self.config.min).min(self.config.max);

        tracing::trace!(provider = %provider_id, raw, clamped, "surge multiplier");
        clamped
    }

    /// Returns the multiplier before randomness and clamping.
    #[must_use]
    pub fn demand_component(&self, now: DateTime<FixedOffset>) -> f64 {
        let mut value = self.config.base;
        if self.is_peak_hour(now.hour()) {
            value += self.config.peak_increment;
        }
        if is_weekend(now) {
            value += self.config.weekend_increment;
        }
        value
    }

    /// Returns true if `hour` lies inside any peak window.
    #[must_use]
    pub fn is_peak_hour(&self, hour: u32) -> bool {
        self.config
            .peak_windows
            .iter()
            .any(|(start, end)| (*start..=*end).contains(&hour))
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SurgeConfig {
        &self.config
    }
}

/// ISO weekday 6 or 7.
#[must_use]
pub fn is_weekend(now: DateTime<FixedOffset>) -> bool {
    now.weekday().number_from_monday() >= 6
}
