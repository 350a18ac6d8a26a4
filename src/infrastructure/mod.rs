//! # Infrastructure Layer
//!
//! - [`cache`]: TTL result cache
//! - [`providers`]: live fare sources and the resilient adapter
//! - [`persistence`]: booking store

pub mod cache;
pub mod persistence;
pub mod providers;
