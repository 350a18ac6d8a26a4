//! # Persistence Layer
//!
//! ## Repository Traits (Ports)
//!
//! - [`BookingRepository`]: append-only booking store
//!
//! ## Implementations
//!
//! - `in_memory`: process-local storage; contents do not survive restart

pub mod in_memory;
pub mod traits;

pub use traits::{BookingRepository, RepositoryError, RepositoryResult};
