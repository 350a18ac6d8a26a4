//! # REST API
//!
//! Thin axum surface over the aggregation engine and the booking store.
//!
//! # Endpoints
//!
//! - `GET /api/health` - Health check
//! - `POST /api/fare-estimate` - Estimates for a route, cheapest first
//! - `GET /api/test-fares` - Estimates for a fixed Bengaluru to Mysuru route
//! - `GET /api/cache-stats` - Result cache keys and counters
//! - `POST /api/clear-cache` - Drop all cached fares
//! - `POST /api/booking` - Record a booking
//! - `GET /api/bookings/{userId}` - A user's bookings
//!
//! # Usage
//!
//! ```ignore
//! use fare_compare::api::rest::{create_router, AppState};
//!
//! let router = create_router(AppState { engine, bookings });
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, BookingResponse, BookingsResponse, CacheStatsResponse,
    CreateBookingRequest, ErrorResponse, FareEstimateRequest, FareEstimateResponse,
    HealthResponse, MessageResponse, TestFaresResponse,
};
pub use routes::create_router;
