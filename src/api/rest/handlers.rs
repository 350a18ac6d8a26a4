//! # REST Handlers
//!
//! Request handlers for the fare comparison endpoints.
//!
//! Handlers stay thin: they validate the body, call the aggregation engine
//! or the booking store, and map [`ApplicationError`] to a status code.

use crate::application::error::ApplicationError;
use crate::application::services::FareAggregationEngine;
use crate::domain::entities::{Booking, FareEstimate, RouteRequest};
use crate::domain::value_objects::{Coordinate, ProviderId, Timestamp};
use crate::infrastructure::cache::CacheStats;
use crate::infrastructure::persistence::BookingRepository;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

// ============================================================================
// Application State
// ============================================================================

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Fare aggregation engine.
    pub engine: Arc<FareAggregationEngine>,
    /// Booking store.
    pub bookings: Arc<dyn BookingRepository>,
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"OK"` while the process serves requests.
    pub status: String,
    /// Human-readable detail.
    pub message: String,
}

/// Body of `POST /api/fare-estimate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FareEstimateRequest {
    /// Pickup point.
    pub pickup: Option<Coordinate>,
    /// Destination point.
    pub destination: Option<Coordinate>,
    /// Distance in kilometres.
    pub distance: Option<f64>,
    /// Duration in seconds.
    pub duration: Option<f64>,
}

/// Response of `POST /api/fare-estimate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareEstimateResponse {
    /// Always true on 200.
    pub success: bool,
    /// Echoed pickup.
    pub pickup: Coordinate,
    /// Echoed destination.
    pub destination: Coordinate,
    /// Estimates, cheapest first.
    pub estimates: Vec<FareEstimate>,
    /// Response generation time.
    pub last_updated: Timestamp,
    /// Human-readable detail.
    pub message: String,
}

/// Fixed route used by `GET /api/test-fares`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRoute {
    /// Pickup point.
    pub pickup: Coordinate,
    /// Destination point.
    pub destination: Coordinate,
    /// Distance in kilometres.
    pub distance: f64,
    /// Duration in seconds.
    pub duration: f64,
}

/// Response of `GET /api/test-fares`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestFaresResponse {
    /// Always true on 200.
    pub success: bool,
    /// The route that was priced.
    pub test_data: TestRoute,
    /// Estimates, cheapest first.
    pub estimates: Vec<FareEstimate>,
    /// Human-readable detail.
    pub message: String,
}

/// Response of `GET /api/cache-stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    /// Always true on 200.
    pub success: bool,
    /// Cache keys and counters.
    pub cache_stats: CacheStats,
}

/// Generic acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Always true on 200.
    pub success: bool,
    /// Human-readable detail.
    pub message: String,
}

/// Body of `POST /api/booking`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Booking user.
    pub user_id: String,
    /// Chosen provider.
    pub service_id: ProviderId,
    /// Pickup point.
    pub pickup: Coordinate,
    /// Destination point.
    pub destination: Coordinate,
    /// Accepted fare.
    pub fare: u64,
    /// Requested ride time; defaults to now.
    #[serde(default)]
    pub booking_time: Option<Timestamp>,
}

/// Response of `POST /api/booking`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    /// Always true on 200.
    pub success: bool,
    /// The stored booking.
    pub booking: Booking,
    /// Human-readable detail.
    pub message: String,
}

/// Response of `GET /api/bookings/{userId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingsResponse {
    /// Always true on 200.
    pub success: bool,
    /// The user's bookings, oldest first.
    pub bookings: Vec<Booking>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error summary.
    pub error: String,
    /// Detail, when there is any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Handler error carrying its status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    /// A 400 with `error` as summary.
    #[must_use]
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                error: error.into(),
                message: None,
            },
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        if err.is_validation() {
            return Self {
                status: StatusCode::BAD_REQUEST,
                body: ErrorResponse {
                    error: err.to_string(),
                    message: None,
                },
            };
        }
        if err.is_not_found() {
            return Self {
                status: StatusCode::NOT_FOUND,
                body: ErrorResponse {
                    error: err.to_string(),
                    message: None,
                },
            };
        }

        error!(error = %err, "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorResponse {
                error: "Internal server error".to_string(),
                message: Some(err.to_string()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Fare comparison API is running".to_string(),
    })
}

/// `POST /api/fare-estimate`
///
/// # Errors
///
/// 400 if a field is missing or the route is invalid, 500 on an aggregation
/// configuration defect.
pub async fn fare_estimate(
    State(state): State<AppState>,
    Json(request): Json<FareEstimateRequest>,
) -> Result<Json<FareEstimateResponse>, ApiError> {
    let (Some(pickup), Some(destination), Some(distance)) =
        (request.pickup, request.destination, request.distance)
    else {
        return Err(ApiError::bad_request("Missing required fields"));
    };

    let route = RouteRequest::new(
        pickup.clone(),
        destination.clone(),
        distance,
        request.duration.unwrap_or(0.0),
    )
    .map_err(ApplicationError::from)?;

    let estimates = state
        .engine
        .get_all_fare_estimates(&route)
        .await
        .map_err(ApplicationError::from)?;

    Ok(Json(FareEstimateResponse {
        success: true,
        pickup,
        destination,
        estimates,
        last_updated: Timestamp::now(),
        message: "Fare estimates fetched successfully".to_string(),
    }))
}

/// `GET /api/test-fares`: prices Bengaluru to Mysuru.
///
/// # Errors
///
/// 500 on an aggregation configuration defect.
pub async fn test_fares(State(state): State<AppState>) -> Result<Json<TestFaresResponse>, ApiError> {
    let test_data = bengaluru_to_mysuru().map_err(ApplicationError::from)?;
    let route = RouteRequest::new(
        test_data.pickup.clone(),
        test_data.destination.clone(),
        test_data.distance,
        test_data.duration,
    )
    .map_err(ApplicationError::from)?;

    let estimates = state
        .engine
        .get_all_fare_estimates(&route)
        .await
        .map_err(ApplicationError::from)?;

    Ok(Json(TestFaresResponse {
        success: true,
        test_data,
        estimates,
        message: "Test fare estimates generated successfully".to_string(),
    }))
}

fn bengaluru_to_mysuru() -> Result<TestRoute, crate::domain::DomainError> {
    Ok(TestRoute {
        pickup: Coordinate::new(12.9716, 77.5946)?.with_address("Bengaluru"),
        destination: Coordinate::new(12.2958, 76.6394)?.with_address("Mysuru"),
        distance: 150.0,
        duration: 10_800.0,
    })
}

/// `GET /api/cache-stats`
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse {
        success: true,
        cache_stats: state.engine.cache_stats(),
    })
}

/// `POST /api/clear-cache`
pub async fn clear_cache(State(state): State<AppState>) -> Json<MessageResponse> {
    state.engine.cache_clear();
    Json(MessageResponse {
        success: true,
        message: "Cache cleared successfully".to_string(),
    })
}

/// `POST /api/booking`
///
/// # Errors
///
/// 400 for an unknown `serviceId` or invalid coordinates, 500 if the store fails.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    if !state.engine.registry().contains(&request.service_id) {
        return Err(ApiError::bad_request(format!(
            "Unknown service: {}",
            request.service_id
        )));
    }
    request
        .pickup
        .validate()
        .and_then(|()| request.destination.validate())
        .map_err(ApplicationError::from)?;

    let booking = Booking::pending(
        request.user_id,
        request.service_id,
        request.pickup,
        request.destination,
        request.fare,
        request.booking_time,
    );
    state
        .bookings
        .append(&booking)
        .await
        .map_err(ApplicationError::from)?;

    Ok(Json(BookingResponse {
        success: true,
        booking,
        message: "Booking request saved successfully".to_string(),
    }))
}

/// `GET /api/bookings/{userId}`
///
/// # Errors
///
/// 500 if the store fails.
pub async fn user_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<BookingsResponse>, ApiError> {
    let bookings = state
        .bookings
        .find_by_user(&user_id)
        .await
        .map_err(ApplicationError::from)?;

    Ok(Json(BookingsResponse {
        success: true,
        bookings,
    }))
}
