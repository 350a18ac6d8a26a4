//! # Result Cache
//!
//! Time-bounded memoization of provider fares, keyed by provider and route
//! endpoints.

pub mod key;
pub mod ttl_cache;

pub use key::fare_cache_key;
pub use ttl_cache::{CacheStats, DEFAULT_TTL_SECS, TtlCache};

use crate::domain::value_objects::ProviderFare;

/// Cache of per-provider fares. The stored value keeps its live/estimated tag.
pub type FareCache = TtlCache<ProviderFare>;
