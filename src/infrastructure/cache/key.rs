//! Cache key derivation.

use crate::domain::value_objects::coordinate::{fingerprint_of, Coordinate};
use crate::domain::value_objects::ProviderId;

/// Builds the cache key `{provider}_{pickupLat}_{pickupLng}_{dropLat}_{dropLng}`.
///
/// Coordinates render in their shortest round-trip decimal form, so
/// `12.9716` and `12.97160` map to the same key. An absent coordinate
/// renders as `nil`.
///
/// # Examples
///
/// ```
/// use fare_compare::domain::value_objects::{Coordinate, ProviderId};
/// use fare_compare::infrastructure::cache::fare_cache_key;
///
/// let pickup = Coordinate::new(12.9716, 77.5946).unwrap();
/// let drop = Coordinate::new(12.2958, 76.6394).unwrap();
///
/// assert_eq!(
///     fare_cache_key(&ProviderId::new("uber"), Some(&pickup), Some(&drop)),
///     "uber_12.9716_77.5946_12.2958_76.6394"
/// );
/// ```
#[must_use]
pub fn fare_cache_key(
    provider_id: &ProviderId,
    pickup: Option<&Coordinate>,
    destination: Option<&Coordinate>,
) -> String {
    format!(
        "{}_{}_{}",
        provider_id,
        fingerprint_of(pickup),
        fingerprint_of(destination)
    )
}
