//! # HTTP Client
//!
//! Shared HTTP client for the remote pricing APIs and the page session.
//!
//! Wraps [`reqwest::Client`] with a fixed request timeout and maps transport
//! failures and non-2xx statuses onto [`ProviderError`].
//!
//! # Examples
//!
//! ```ignore
//! use fare_compare::infrastructure::providers::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let body: serde_json::Value = client
//!     .get_with_params_and_headers(url, &[("pickup_lat", 12.97)], headers)
//!     .await?;
//! ```

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper for fare sources.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be built.
    pub fn new(timeout_ms: u64) -> ProviderResult<Self> {
        Self::with_headers(timeout_ms, HeaderMap::new())
    }

    /// Creates a client that sends `default_headers` on every request.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be built.
    pub fn with_headers(timeout_ms: u64, default_headers: HeaderMap) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(default_headers)
            .build()
            .map_err(|e| ProviderError::internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the request timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// GET with query parameters and extra headers, deserializing a JSON body.
    ///
    /// # Errors
    ///
    /// Returns a transport, status or protocol error.
    pub async fn get_with_params_and_headers<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
        headers: HeaderMap,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_json(response).await
    }

    /// GET returning the body as text.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error.
    pub async fn get_text(&self, url: &str) -> ProviderResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_text(response).await
    }

    /// GET with query parameters returning the body as text.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error.
    pub async fn get_text_with_params<P: Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> ProviderResult<String> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_text(response).await
    }

    /// POST an URL-encoded form returning the body as text.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error.
    pub async fn post_form_text<F: Serialize + ?Sized>(
        &self,
        url: &str,
        form: &F,
    ) -> ProviderResult<String> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_text(response).await
    }

    async fn handle_json<T: DeserializeOwned>(&self, response: Response) -> ProviderResult<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ProviderError::protocol(format!("failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(self.map_status_error(status, &error_body))
        }
    }

    async fn handle_text(&self, response: Response) -> ProviderResult<String> {
        let status = response.status();

        if status.is_success() {
            response
                .text()
                .await
                .map_err(|e| self.map_reqwest_error(e))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(self.map_status_error(status, &error_body))
        }
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::timeout_with_duration("request timed out", self.timeout_ms)
        } else if error.is_connect() {
            ProviderError::connection(format!("connection failed: {}", error))
        } else {
            ProviderError::connection(format!("HTTP request failed: {}", error))
        }
    }

    fn map_status_error(&self, status: StatusCode, body: &str) -> ProviderError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::authentication(format!("authentication failed: {}", body))
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited("rate limit exceeded"),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::timeout(format!("upstream timeout ({})", status))
            }
            s if s.is_server_error() => {
                ProviderError::connection(format!("server error ({}): {}", status, body))
            }
            _ => ProviderError::protocol(format!("HTTP error ({}): {}", status, body)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn new_client() {
        let client = HttpClient::new(5000).unwrap();
        assert_eq!(client.timeout_ms(), 5000);
    }

    #[tokio::test]
    async fn json_body_is_deserialized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/estimate"))
            .and(query_param("pickup_lat", "12.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 245})))
            .mount(&server)
            .await;

        let client = HttpClient::new(5000).unwrap();
        let body: Value = client
            .get_with_params_and_headers(
                &format!("{}/estimate", server.uri()),
                &[("pickup_lat", 12.5)],
                HeaderMap::new(),
            )
            .await
            .unwrap();
        assert_eq!(body["total"], 245);
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = HttpClient::new(5000).unwrap();
        let err = client
            .get_with_params_and_headers::<Value, _>(&server.uri(), &[("a", 1)], HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Authentication { .. }));
    }

    #[tokio::test]
    async fn server_error_is_connection_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = HttpClient::new(5000).unwrap();
        let err = client.get_text(&server.uri()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Connection { .. }));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = HttpClient::new(50).unwrap();
        let err = client.get_text(&server.uri()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout { .. }));
    }

    #[tokio::test]
    async fn form_is_posted_url_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fare"))
            .and(body_string_contains("pickup=MG+Road"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = HttpClient::new(5000).unwrap();
        let body = client
            .post_form_text(&format!("{}/fare", server.uri()), &[("pickup", "MG Road")])
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }
}
