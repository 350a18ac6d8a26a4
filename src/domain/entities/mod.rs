//! # Domain Entities
//!
//! - [`ProviderConfig`] / [`ProviderRegistry`]: static provider configuration
//! - [`RouteRequest`]: route to price
//! - [`FareEstimate`]: uniform per-provider output record
//! - [`Booking`]: append-only booking record

pub mod booking;
pub mod fare_estimate;
pub mod provider;
pub mod route;

pub use booking::{Booking, BookingStatus};
pub use fare_estimate::FareEstimate;
pub use provider::{Credentials, ProviderConfig, ProviderRegistry};
pub use route::RouteRequest;
