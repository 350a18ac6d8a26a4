//! # Fare Compare
//!
//! Multi-source ride fare aggregation.
//!
//! For one route the engine asks every configured provider for a fare at
//! once: remote pricing APIs, a scraped fare-calculator page, or a local
//! fallback formula when neither answers. Every provider always yields an
//! estimate, tagged live or estimated, and the result is sorted cheapest
//! first. Live answers are cached per provider and route.
//!
//! # Layers
//!
//! - [`domain`]: coordinates, providers, routes, estimates, bookings, surge
//!   and fallback pricing
//! - [`application`]: the fan-out [`FareAggregationEngine`](application::services::FareAggregationEngine)
//! - [`infrastructure`]: result cache, live sources, booking store
//! - [`api`]: axum REST surface
//! - [`config`], [`telemetry`], [`bootstrap`]: process wiring

pub mod api;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
