//! # Domain Services
//!
//! Domain services encapsulating pricing logic that doesn't naturally
//! belong to a single entity or value object.
//!
//! ## Services
//!
//! - [`surge::SurgeCalculator`]: time-of-day / weekend surge multiplier
//! - [`fallback::FallbackPricingModel`]: local fare formula
//!
//! ## Injectable Collaborators
//!
//! - [`clock::Clock`]: current time
//! - [`random::RandomSource`]: uniform randomness

pub mod clock;
pub mod fallback;
pub mod random;
pub mod surge;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fallback::{FallbackPricingModel, fare_with_surge};
pub use random::{FixedRandom, RandomSource, SequenceRandom, ThreadRandom};
pub use surge::{SurgeCalculator, SurgeConfig};
