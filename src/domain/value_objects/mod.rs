//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`ProviderId`]: String-based provider identifier
//! - [`BookingId`]: UUID-based booking identifier
//!
//! ## Geography and Time
//!
//! - [`Coordinate`]: Latitude/longitude with optional address
//! - [`Timestamp`]: UTC instant
//!
//! ## Pricing
//!
//! - [`ProviderFare`]: Fare amount tagged with its data source
//!
//! ## Domain Enums
//!
//! - `DataSource`: Live or Estimated
//! - `VehicleType`: Car or Bike
//! - `LiveSource`: Live retrieval path of a provider

pub mod coordinate;
pub mod enums;
pub mod fare;
pub mod ids;
pub mod timestamp;

pub use coordinate::Coordinate;
pub use enums::{DataSource, LiveSource, ParseEnumError, VehicleType};
pub use fare::ProviderFare;
pub use ids::{BookingId, ProviderId};
pub use timestamp::Timestamp;
