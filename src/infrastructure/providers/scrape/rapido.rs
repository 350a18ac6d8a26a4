//! # Rapido Fare Scraper
//!
//! Live source that reads the fare off a public fare-calculator page.
//!
//! One attempt opens a fresh [`PageSession`], enters pickup and destination,
//! submits, waits for the result element and returns its text. Page
//! navigation, submission and the element wait are each bounded, and
//! [`FareSource::timeout_ms`] covers all three. The session is closed before
//! returning, whether the attempt succeeded or not. If the attempt is
//! cancelled mid-scrape, [`SessionGuard`] closes it on a background task.

use crate::domain::entities::{ProviderConfig, RouteRequest};
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::scrape::session::{
    DEFAULT_POLL_INTERVAL_MS, PageSession, PageSessionFactory,
};
use crate::infrastructure::providers::traits::{FareSource, RawFare};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Text entered when the pickup has no address.
pub const DEFAULT_PICKUP_LABEL: &str = "Pickup Location";
/// Text entered when the destination has no address.
pub const DEFAULT_DESTINATION_LABEL: &str = "Destination";

/// CSS selectors of the fare-calculator page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeSelectors {
    /// Pickup input.
    pub pickup: String,
    /// Destination input.
    pub destination: String,
    /// Submit control.
    pub submit: String,
    /// Element holding the fare text.
    pub result: String,
}

impl Default for ScrapeSelectors {
    fn default() -> Self {
        Self {
            pickup: "#pickup".to_string(),
            destination: "#destination".to_string(),
            submit: "#calculate-fare".to_string(),
            result: ".fare-amount".to_string(),
        }
    }
}

/// Scrape timeouts, user agent and selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Bound on each page navigation in milliseconds.
    pub navigation_timeout_ms: u64,
    /// Bound on waiting for the result element in milliseconds.
    pub element_timeout_ms: u64,
    /// Delay between re-checks while waiting for the result element.
    pub poll_interval_ms: u64,
    /// User agent sent with page requests.
    pub user_agent: String,
    /// Page selectors.
    pub selectors: ScrapeSelectors,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: 10_000,
            element_timeout_ms: 5_000,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/120.0 Safari/537.36"
                .to_string(),
            selectors: ScrapeSelectors::default(),
        }
    }
}

/// Scraping fare source.
#[derive(Debug, Clone)]
pub struct RapidoScraper {
    provider_id: ProviderId,
    page_url: String,
    sessions: Arc<dyn PageSessionFactory>,
    config: ScrapeConfig,
}

impl RapidoScraper {
    /// Creates a scraper for `page_url`.
    #[must_use]
    pub fn new(
        provider_id: ProviderId,
        page_url: impl Into<String>,
        sessions: Arc<dyn PageSessionFactory>,
        config: ScrapeConfig,
    ) -> Self {
        Self {
            provider_id,
            page_url: page_url.into(),
            sessions,
            config,
        }
    }

    /// Creates a scraper from a provider's configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the provider has no page URL.
    pub fn from_config(
        provider: &ProviderConfig,
        sessions: Arc<dyn PageSessionFactory>,
        config: ScrapeConfig,
    ) -> ProviderResult<Self> {
        let page_url = provider.endpoint().ok_or_else(|| {
            ProviderError::internal(format!("provider {} has no page URL", provider.id()))
        })?;
        Ok(Self::new(provider.id().clone(), page_url, sessions, config))
    }

    async fn scrape(
        &self,
        session: &mut dyn PageSession,
        route: &RouteRequest,
    ) -> ProviderResult<RawFare> {
        let selectors = &self.config.selectors;
        let navigation_ms = self.config.navigation_timeout_ms;

        bounded(navigation_ms, "page navigation", session.open(&self.page_url)).await?;

        let pickup = route.pickup().address().unwrap_or(DEFAULT_PICKUP_LABEL);
        let destination = route
            .destination()
            .address()
            .unwrap_or(DEFAULT_DESTINATION_LABEL);
        session.fill(&selectors.pickup, pickup).await?;
        session.fill(&selectors.destination, destination).await?;

        bounded(navigation_ms, "fare submission", session.click(&selectors.submit)).await?;

        session
            .wait_for(
                &selectors.result,
                Duration::from_millis(self.config.element_timeout_ms),
            )
            .await?;
        let text = session.text(&selectors.result).await?;

        Ok(RawFare::Text(text))
    }
}

/// Owns a session for one attempt and closes it even if the attempt is dropped.
#[derive(Debug)]
struct SessionGuard {
    session: Option<Box<dyn PageSession>>,
}

impl SessionGuard {
    fn new(session: Box<dyn PageSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    fn session(&mut self) -> ProviderResult<&mut dyn PageSession> {
        match self.session.as_deref_mut() {
            Some(session) => Ok(session),
            None => Err(ProviderError::internal("page session already released")),
        }
    }

    async fn close(mut self) {
        if let Some(mut session) = self.session.take() {
            session.close().await;
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("scrape cancelled, closing page session in background");
                handle.spawn(async move {
                    session.close().await;
                });
            }
            Err(_) => warn!("scrape cancelled outside a runtime, page session not closed"),
        }
    }
}

async fn bounded<T>(
    timeout_ms: u64,
    step: &str,
    future: impl Future<Output = ProviderResult<T>>,
) -> ProviderResult<T> {
    tokio::time::timeout(Duration::from_millis(timeout_ms), future)
        .await
        .map_err(|_| ProviderError::timeout_with_duration(format!("{} timed out", step), timeout_ms))?
}

#[async_trait]
impl FareSource for RapidoScraper {
    fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    /// Navigation, submission and element wait, back to back.
    fn timeout_ms(&self) -> u64 {
        self.config
            .navigation_timeout_ms
            .saturating_mul(2)
            .saturating_add(self.config.element_timeout_ms)
    }

    async fn fetch_raw(&self, route: &RouteRequest) -> ProviderResult<RawFare> {
        let mut guard = SessionGuard::new(self.sessions.create()?);
        let outcome = match guard.session() {
            Ok(session) => self.scrape(session, route).await,
            Err(e) => Err(e),
        };
        guard.close().await;

        if let Err(e) = &outcome {
            debug!(provider = %self.provider_id, error = %e, "scrape attempt failed");
        }
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Coordinate;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Recorder {
        closed: AtomicUsize,
        filled: Mutex<Vec<(String, String)>>,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Behaviour {
        Works,
        SlowOpen,
        SlowSteps,
        NoResultElement,
        RenamedInput,
    }

    #[derive(Debug)]
    struct StubSession {
        recorder: Arc<Recorder>,
        behaviour: Behaviour,
    }

    #[async_trait]
    impl PageSession for StubSession {
        async fn open(&mut self, _url: &str) -> ProviderResult<()> {
            match self.behaviour {
                Behaviour::SlowOpen => tokio::time::sleep(Duration::from_secs(60)).await,
                Behaviour::SlowSteps => tokio::time::sleep(Duration::from_millis(30)).await,
                _ => {}
            }
            Ok(())
        }

        async fn fill(&mut self, selector: &str, value: &str) -> ProviderResult<()> {
            if self.behaviour == Behaviour::RenamedInput && selector == "#pickup" {
                return Err(ProviderError::missing_element(selector));
            }
            self.recorder
                .filled
                .lock()
                .push((selector.to_string(), value.to_string()));
            Ok(())
        }

        async fn click(&mut self, _selector: &str) -> ProviderResult<()> {
            if self.behaviour == Behaviour::SlowSteps {
                tokio::time::sleep(Duration::from_millis(30)).await;
            }
            Ok(())
        }

        async fn wait_for(&mut self, selector: &str, timeout: Duration) -> ProviderResult<()> {
            if self.behaviour == Behaviour::NoResultElement {
                return Err(ProviderError::timeout_with_duration(
                    format!("waiting for {}", selector),
                    timeout.as_millis() as u64,
                ));
            }
            if self.behaviour == Behaviour::SlowSteps {
                tokio::time::sleep(Duration::from_millis(30)).await;
            }
            Ok(())
        }

        async fn text(&mut self, _selector: &str) -> ProviderResult<String> {
            Ok("₹180-220".to_string())
        }

        async fn close(&mut self) {
            self.recorder.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Debug)]
    struct StubFactory {
        recorder: Arc<Recorder>,
        behaviour: Behaviour,
    }

    impl PageSessionFactory for StubFactory {
        fn create(&self) -> ProviderResult<Box<dyn PageSession>> {
            Ok(Box::new(StubSession {
                recorder: self.recorder.clone(),
                behaviour: self.behaviour,
            }))
        }
    }

    fn scraper(behaviour: Behaviour) -> (RapidoScraper, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let config = ScrapeConfig {
            navigation_timeout_ms: 50,
            element_timeout_ms: 50,
            ..ScrapeConfig::default()
        };
        let scraper = RapidoScraper::new(
            ProviderId::new("rapido"),
            "https://rapido.example/fare-calculator",
            Arc::new(StubFactory {
                recorder: recorder.clone(),
                behaviour,
            }),
            config,
        );
        (scraper, recorder)
    }

    fn route(with_addresses: bool) -> RouteRequest {
        let mut pickup = Coordinate::new(12.9716, 77.5946).unwrap();
        let mut destination = Coordinate::new(12.2958, 76.6394).unwrap();
        if with_addresses {
            pickup = pickup.with_address("MG Road");
            destination = destination.with_address("Mysuru Palace");
        }
        RouteRequest::new(pickup, destination, 150.0, 10_800.0).unwrap()
    }

    #[tokio::test]
    async fn returns_result_text_and_closes() {
        let (scraper, recorder) = scraper(Behaviour::Works);
        let raw = scraper.fetch_raw(&route(true)).await.unwrap();

        assert_eq!(raw, RawFare::Text("₹180-220".into()));
        assert_eq!(recorder.closed.load(Ordering::SeqCst), 1);
        assert_eq!(
            recorder.filled.lock().clone(),
            vec![
                ("#pickup".to_string(), "MG Road".to_string()),
                ("#destination".to_string(), "Mysuru Palace".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn unnamed_points_use_placeholder_labels() {
        let (scraper, recorder) = scraper(Behaviour::Works);
        scraper.fetch_raw(&route(false)).await.unwrap();

        let filled = recorder.filled.lock().clone();
        assert_eq!(filled[0].1, DEFAULT_PICKUP_LABEL);
        assert_eq!(filled[1].1, DEFAULT_DESTINATION_LABEL);
    }

    mod failures_release_session {
        use super::*;

        #[tokio::test]
        async fn slow_navigation() {
            let (scraper, recorder) = scraper(Behaviour::SlowOpen);
            let err = scraper.fetch_raw(&route(true)).await.unwrap_err();

            assert!(matches!(err, ProviderError::Timeout { timeout_ms: Some(50), .. }));
            assert_eq!(recorder.closed.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn missing_result_element() {
            let (scraper, recorder) = scraper(Behaviour::NoResultElement);
            assert!(scraper.fetch_raw(&route(true)).await.is_err());
            assert_eq!(recorder.closed.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn renamed_input() {
            let (scraper, recorder) = scraper(Behaviour::RenamedInput);
            let err = scraper.fetch_raw(&route(true)).await.unwrap_err();

            assert!(err.is_structural());
            assert_eq!(recorder.closed.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn cancelled_mid_scrape() {
            let (scraper, recorder) = scraper(Behaviour::SlowOpen);
            let cancelled =
                tokio::time::timeout(Duration::from_millis(10), scraper.fetch_raw(&route(true)))
                    .await;
            assert!(cancelled.is_err());

            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(recorder.closed.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn steps_within_their_bounds_finish_inside_source_timeout() {
        let (scraper, recorder) = scraper(Behaviour::SlowSteps);
        let raw = tokio::time::timeout(
            Duration::from_millis(scraper.timeout_ms()),
            scraper.fetch_raw(&route(true)),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(raw, RawFare::Text("₹180-220".into()));
        assert_eq!(recorder.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn timeout_covers_every_bounded_step() {
        let (scraper, _) = scraper(Behaviour::Works);
        assert_eq!(scraper.timeout_ms(), 150);
    }

    #[test]
    fn default_selectors() {
        let selectors = ScrapeSelectors::default();
        assert_eq!(selectors.submit, "#calculate-fare");
        assert_eq!(selectors.result, ".fare-amount");
    }
}
