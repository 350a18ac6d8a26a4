//! # Application Layer
//!
//! Orchestration of domain services and infrastructure adapters.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
