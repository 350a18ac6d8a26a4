//! # Domain Layer
//!
//! Fare domain model, free of I/O.
//!
//! - [`value_objects`]: coordinates, identifiers, timestamps, enums
//! - [`entities`]: providers, routes, estimates, bookings
//! - [`services`]: surge and fallback pricing, clock and randomness ports
//! - [`errors`]: domain error type

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
