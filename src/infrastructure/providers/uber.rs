//! # Uber Price Estimate Adapter
//!
//! Live source for the Uber-style pricing API.
//!
//! Sends `GET {endpoint}?start_latitude=..&start_longitude=..&end_latitude=..&end_longitude=..`
//! with `Authorization: Token <key>` and reads the fare from
//! `prices[0].estimate`, which is usually a textual range.

use crate::domain::entities::{Credentials, ProviderConfig, RouteRequest};
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::{FareSource, RawFare};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;

/// JSON pointer of the fare inside the response body.
const PRICE_POINTER: &str = "/prices/0/estimate";

/// Uber-style remote pricing API.
#[derive(Debug, Clone)]
pub struct UberApiSource {
    provider_id: ProviderId,
    endpoint: String,
    credentials: Option<Credentials>,
    client: HttpClient,
}

impl UberApiSource {
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

    fn auth_headers(&self) -> ProviderResult<HeaderMap> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| ProviderError::authentication("no API key configured"))?;
        let value = HeaderValue::from_str(&format!("Token {}", credentials.secret()))
            .map_err(|_| ProviderError::authentication("API key is not a valid header value"))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

#[async_trait]
impl FareSource for UberApiSource {
    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    fn timeout_ms(&self) -> u64 {
        self.client.timeout_ms()
    }

    async fn fetch_raw(&self, route: &RouteRequest) -> ProviderResult<RawFare> {
        let headers = self.auth_headers()?;
        let params = [
            ("start_latitude", route.pickup().lat()),
            ("start_longitude", route.pickup().lng()),
            ("end_latitude", route.destination().lat()),
            ("end_longitude", route.destination().lng()),
        ];

        let body: Value = self
            .client
            .get_with_params_and_headers(&self.endpoint, &params, headers)
            .await?;

        Ok(RawFare::from_json(body.pointer(PRICE_POINTER)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Coordinate;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
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

    fn source(server: &MockServer, key: Option<&str>) -> UberApiSource {
        UberApiSource::new(
            ProviderId::new("uber"),
            format!("{}/v1.2/estimates/price", server.uri()),
            key.map(Credentials::api_key),
            5000,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn reads_first_price_estimate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1.2/estimates/price"))
            .and(header("Authorization", "Token secret"))
            .and(query_param("start_latitude", "12.9716"))
            .and(query_param("end_longitude", "76.6394"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "prices": [{"estimate": "₹2400-2600"}, {"estimate": "₹9999"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let raw = source(&server, Some("secret")).fetch_raw(&route()).await.unwrap();
        assert_eq!(raw, RawFare::Text("₹2400-2600".into()));
    }

    #[tokio::test]
    async fn empty_price_list_is_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prices": []})))
            .mount(&server)
            .await;

        let raw = source(&server, Some("secret")).fetch_raw(&route()).await.unwrap();
        assert_eq!(raw, RawFare::Missing);
    }

    #[tokio::test]
    async fn missing_key_fails_without_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = source(&server, None).fetch_raw(&route()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Authentication { .. }));
    }

    #[test]
    fn from_config_requires_endpoint() {
        let provider = ProviderConfig::new("uber", "Uber", 50.0, 12.0);
        assert!(UberApiSource::from_config(&provider, 5000).is_err());
    }
}
