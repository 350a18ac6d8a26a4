//! # Ola Fare Adapter
//!
//! Live source for the Ola-style pricing API: `GET {endpoint}` with
//! `X-APP-TOKEN` and `pickup_lat`, `pickup_lng`, `drop_lat`, `drop_lng`
//! query parameters. The fare is at `fare_breakup.total`.

use crate::domain::entities::{Credentials, ProviderConfig, RouteRequest};
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::{FareSource, RawFare};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

const APP_TOKEN_HEADER: &str = "X-APP-TOKEN";
const TOTAL_POINTER: &str = "/fare_breakup/total";

/// Ola-style remote pricing API.
#[derive(Debug, Clone)]
pub struct OlaApiSource {
    provider_id: ProviderId,
    endpoint: String,
    credentials: Option<Credentials>,
    client: HttpClient,
}

impl OlaApiSource {
    /// Creates a source calling `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the HTTP client cannot be built.
    pub fn new(
        provider_id: ProviderId,
        endpoint: impl Into<String>,
        credentials: Option<Credentials>,
        timeout_ms: u64,
    ) -> ProviderResult<Self> {
        Ok(Self {
            provider_id,
            endpoint: endpoint.into(),
            credentials,
            client: HttpClient::new(timeout_ms)?,
        })
    }

    /// Creates a source from a provider's configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the provider has no endpoint or
    /// the HTTP client cannot be built.
    pub fn from_config(provider: &ProviderConfig, timeout_ms: u64) -> ProviderResult<Self> {
        let endpoint = provider.endpoint().ok_or_else(|| {
            ProviderError::internal(format!("provider {} has no endpoint", provider.id()))
        })?;
        Self::new(
            provider.id().clone(),
            endpoint,
            provider.credentials().cloned(),
            timeout_ms,
        )
    }
}

#[async_trait]
impl FareSource for OlaApiSource {
    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    fn timeout_ms(&self) -> u64 {
        self.client.timeout_ms()
    }

    async fn fetch_raw(&self, route: &RouteRequest) -> ProviderResult<RawFare> {
        let token = self
            .credentials
            .as_ref()
            .ok_or_else(|| ProviderError::authentication("no app token configured"))?;
        let token = HeaderValue::from_str(token.secret())
            .map_err(|_| ProviderError::authentication("app token is not a valid header value"))?;
        let mut headers = HeaderMap::new();
        headers.insert(APP_TOKEN_HEADER, token);

        let params = [
            ("pickup_lat", route.pickup().lat()),
            ("pickup_lng", route.pickup().lng()),
            ("drop_lat", route.destination().lat()),
            ("drop_lng", route.destination().lng()),
        ];

        let body: Value = self
            .client
            .get_with_params_and_headers(&self.endpoint, &params, headers)
            .await?;

        Ok(RawFare::from_json(body.pointer(TOTAL_POINTER)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Coordinate;
    use serde_json::json;
    use wiremock::matchers::{header, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn route() -> RouteRequest {
        RouteRequest::new(
            Coordinate::new(12.9716, 77.5946).unwrap(),
            Coordinate::new(12.2958, 76.6394).unwrap(),
            150.0,
            10_800.0,
        )
        .unwrap()
    }

    fn source(server: &MockServer) -> OlaApiSource {
        OlaApiSource::new(
            ProviderId::new("ola"),
            format!("{}/v1/products", server.uri()),
            Some(Credentials::api_key("app-token")),
            5000,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn reads_nested_total() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("X-APP-TOKEN", "app-token"))
            .and(query_param("pickup_lat", "12.9716"))
            .and(query_param("drop_lng", "76.6394"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fare_breakup": {"base": 45, "total": 1580.0}
            })))
            .mount(&server)
            .await;

        let raw = source(&server).fetch_raw(&route()).await.unwrap();
        assert_eq!(raw, RawFare::Number(1580.0));
    }

    #[tokio::test]
    async fn malformed_body_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = source(&server).fetch_raw(&route()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Protocol { .. }));
    }

    #[tokio::test]
    async fn rate_limit_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = source(&server).fetch_raw(&route()).await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited { .. }));
    }
}
