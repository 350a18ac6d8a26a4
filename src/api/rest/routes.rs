//! # REST Routes
//!
//! Router wiring for the fare comparison endpoints.

use crate::api::rest::handlers::{
    AppState, cache_stats, clear_cache, create_booking, fare_estimate, health, test_fares,
    user_bookings,
};
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the router with request tracing and permissive CORS.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/fare-estimate", post(fare_estimate))
        .route("/api/test-fares", get(test_fares))
        .route("/api/cache-stats", get(cache_stats))
        .route("/api/clear-cache", post(clear_cache))
        .route("/api/booking", post(create_booking))
        .route("/api/bookings/{user_id}", get(user_bookings))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::{AggregationConfig, FareAggregationEngine};
    use crate::domain::entities::ProviderRegistry;
    use crate::domain::services::clock::{Clock, ManualClock};
    use crate::domain::services::fallback::FallbackPricingModel;
    use crate::domain::services::random::FixedRandom;
    use crate::domain::services::surge::{SurgeCalculator, SurgeConfig};
    use crate::infrastructure::cache::{DEFAULT_TTL_SECS, FareCache};
    use crate::infrastructure::persistence::in_memory::InMemoryBookingRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{FixedOffset, TimeZone};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router() -> Router {
        let ist = FixedOffset::east_opt(19_800).unwrap();
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(
            ist.with_ymd_and_hms(2024, 3, 5, 13, 0, 0).unwrap(),
        ));
        let random = Arc::new(FixedRandom::new(0.5));
        let surge = Arc::new(SurgeCalculator::new(SurgeConfig::default(), random.clone()));
        let fallback = Arc::new(FallbackPricingModel::new(
            Arc::new(ProviderRegistry::defaults()),
            surge.clone(),
            clock.clone(),
        ));
        let cache = Arc::new(FareCache::new(clock.clone(), DEFAULT_TTL_SECS));
        let engine = FareAggregationEngine::new(
            fallback,
            surge,
            cache,
            clock,
            random,
            AggregationConfig::default(),
        );

        create_router(AppState {
            engine: Arc::new(engine),
            bookings: Arc::new(InMemoryBookingRepository::new()),
        })
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = send(router(), get_request("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
    }

    mod fare_estimate {
        use super::*;

        #[tokio::test]
        async fn returns_sorted_estimates() {
            let request = json!({
                "pickup": {"lat": 12.9716, "lng": 77.5946, "address": "MG Road"},
                "destination": {"lat": 12.2958, "lng": 76.6394},
                "distance": 150,
                "duration": 10800
            });
            let (status, body) = send(router(), post_json("/api/fare-estimate", &request)).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
            assert_eq!(body["pickup"]["address"], "MG Road");
            let estimates = body["estimates"].as_array().unwrap();
            assert_eq!(estimates.len(), 4);
            assert_eq!(estimates[0]["providerId"], "rapido");
            assert_eq!(estimates[0]["vehicleType"], "Bike");
            assert_eq!(estimates[0]["dataSource"], "Estimated");
            assert_eq!(estimates[0]["durationMinutes"], 180);
            assert!(body["lastUpdated"].is_string());
        }

        #[tokio::test]
        async fn missing_distance_is_bad_request() {
            let request = json!({
                "pickup": {"lat": 12.9716, "lng": 77.5946},
                "destination": {"lat": 12.2958, "lng": 76.6394}
            });
            let (status, body) = send(router(), post_json("/api/fare-estimate", &request)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Missing required fields");
        }

        #[tokio::test]
        async fn non_positive_distance_is_bad_request() {
            let request = json!({
                "pickup": {"lat": 12.9716, "lng": 77.5946},
                "destination": {"lat": 12.2958, "lng": 76.6394},
                "distance": 0
            });
            let (status, _) = send(router(), post_json("/api/fare-estimate", &request)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_fares_prices_fixed_route() {
        let (status, body) = send(router(), get_request("/api/test-fares")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["testData"]["distance"], 150.0);
        assert_eq!(body["estimates"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn cache_admin_endpoints() {
        let router = router();

        let (status, body) = send(router.clone(), post_json("/api/clear-cache", &json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Cache cleared successfully");

        let (status, body) = send(router, get_request("/api/cache-stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cacheStats"]["keyCount"], 0);
        assert!(body["cacheStats"]["keys"].as_array().unwrap().is_empty());
    }

    mod bookings {
        use super::*;

        fn booking_body(service: &str) -> Value {
            json!({
                "userId": "asha",
                "serviceId": service,
                "pickup": {"lat": 12.9716, "lng": 77.5946},
                "destination": {"lat": 12.2958, "lng": 76.6394},
                "fare": 1545
            })
        }

        #[tokio::test]
        async fn booking_is_stored_and_listed() {
            let router = router();

            let (status, body) =
                send(router.clone(), post_json("/api/booking", &booking_body("ola"))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["booking"]["status"], "pending");
            assert_eq!(body["booking"]["serviceId"], "ola");

            let (status, body) = send(router, get_request("/api/bookings/asha")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["bookings"].as_array().unwrap().len(), 1);
        }

        #[tokio::test]
        async fn unknown_service_is_bad_request() {
            let (status, body) =
                send(router(), post_json("/api/booking", &booking_body("lyft"))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].as_str().unwrap().contains("lyft"));
        }

        #[tokio::test]
        async fn unknown_user_has_empty_history() {
            let (status, body) = send(router(), get_request("/api/bookings/nobody")).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body["bookings"].as_array().unwrap().is_empty());
        }
    }
}
