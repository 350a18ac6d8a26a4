//! # API Layer
//!
//! - [`rest`]: HTTP/JSON endpoints (axum)

pub mod rest;
