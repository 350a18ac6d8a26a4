//! # Page Session
//!
//! Browser-like interaction with a fare-calculator page.
//!
//! [`PageSession`] is the narrow set of page operations the scraper needs:
//! open a page, fill inputs, click a submit control, wait for an element and
//! read its text. A session lives for exactly one retrieval attempt and is
//! closed by its owner on every exit path.
//!
//! [`HttpPageSession`] drives plain server-rendered forms over HTTP: filled
//! inputs are submitted with the enclosing form's method and action, and the
//! response becomes the current page. Tests substitute stub sessions through
//! [`PageSessionFactory`].

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use std::time::Duration;

/// Default delay between re-checks while waiting for an element.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// One page interaction session.
#[async_trait]
pub trait PageSession: Send + fmt::Debug {
    /// Navigates to `url`.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error if the page cannot be loaded.
    async fn open(&mut self, url: &str) -> ProviderResult<()>;

    /// Types `value` into the input matched by `selector`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::MissingElement` if nothing matches.
    async fn fill(&mut self, selector: &str, value: &str) -> ProviderResult<()>;

    /// Activates the control matched by `selector`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::MissingElement` if nothing matches, or a
    /// transport error if the resulting navigation fails.
    async fn click(&mut self, selector: &str) -> ProviderResult<()>;

    /// Waits until `selector` matches an element.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Timeout` if nothing matches within `timeout`.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> ProviderResult<()>;

    /// Returns the trimmed text content of the first element matched by `selector`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::MissingElement` if nothing matches.
    async fn text(&mut self, selector: &str) -> ProviderResult<String>;

    /// Releases the session. Further calls fail.
    async fn close(&mut self);
}

/// Creates a fresh session per retrieval attempt.
pub trait PageSessionFactory: Send + Sync + fmt::Debug {
    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the session cannot be started.
    fn create(&self) -> ProviderResult<Box<dyn PageSession>>;
}

/// Factory for [`HttpPageSession`]s sharing one navigation timeout and user agent.
#[derive(Debug, Clone)]
pub struct HttpPageSessionFactory {
    navigation_timeout_ms: u64,
    user_agent: String,
    poll_interval: Duration,
}

impl HttpPageSessionFactory {
    /// Creates a factory.
    #[must_use]
    pub fn new(navigation_timeout_ms: u64, user_agent: impl Into<String>) -> Self {
        Self {
            navigation_timeout_ms,
            user_agent: user_agent.into(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Sets the delay between re-checks in [`PageSession::wait_for`].
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl PageSessionFactory for HttpPageSessionFactory {
    fn create(&self) -> ProviderResult<Box<dyn PageSession>> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|e| ProviderError::internal(format!("invalid user agent: {}", e)))?;
        headers.insert(USER_AGENT, agent);

        let client = HttpClient::with_headers(self.navigation_timeout_ms, headers)?;
        Ok(Box::new(HttpPageSession::new(client, self.poll_interval)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
struct PageRequest {
    method: FormMethod,
    url: Url,
    fields: Vec<(String, String)>,
}

#[derive(Debug)]
struct FormSubmission {
    action: Option<String>,
    method: FormMethod,
    defaults: Vec<(String, String)>,
}

/// Session over plain HTTP and static HTML.
#[derive(Debug)]
pub struct HttpPageSession {
    client: HttpClient,
    poll_interval: Duration,
    last_request: Option<PageRequest>,
    html: String,
    filled: Vec<(String, String)>,
    closed: bool,
}

impl HttpPageSession {
    /// Creates a session using `client` for every navigation.
    #[must_use]
    pub fn new(client: HttpClient, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
            last_request: None,
            html: String::new(),
            filled: Vec::new(),
            closed: false,
        }
    }

    /// Returns true once [`PageSession::close`] has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn current_url(&self) -> ProviderResult<&Url> {
        if self.closed {
            return Err(ProviderError::internal("page session is closed"));
        }
        self.last_request
            .as_ref()
            .map(|request| &request.url)
            .ok_or_else(|| ProviderError::protocol("no page is open"))
    }

    async fn navigate(&mut self, request: PageRequest) -> ProviderResult<()> {
        let body = match request.method {
            FormMethod::Get if request.fields.is_empty() => {
                self.client.get_text(request.url.as_str()).await?
            }
            FormMethod::Get => {
                self.client
                    .get_text_with_params(request.url.as_str(), &request.fields)
                    .await?
            }
            FormMethod::Post => {
                self.client
                    .post_form_text(request.url.as_str(), &request.fields)
                    .await?
            }
        };
        self.html = body;
        self.last_request = Some(request);
        Ok(())
    }

    /// Re-issues the last request until `selector` matches.
    async fn poll_until_present(&mut self, selector: &str) -> ProviderResult<()> {
        loop {
            if contains(&self.html, selector)? {
                return Ok(());
            }
            tokio::time::sleep(self.poll_interval).await;
            if let Some(request) = self.last_request.clone() {
                self.navigate(request).await?;
            }
        }
    }
}

#[async_trait]
impl PageSession for HttpPageSession {
    async fn open(&mut self, url: &str) -> ProviderResult<()> {
        if self.closed {
            return Err(ProviderError::internal("page session is closed"));
        }
        let url = Url::parse(url)
            .map_err(|e| ProviderError::protocol(format!("invalid page URL {}: {}", url, e)))?;
        self.filled.clear();
        self.navigate(PageRequest {
            method: FormMethod::Get,
            url,
            fields: Vec::new(),
        })
        .await
    }

    async fn fill(&mut self, selector: &str, value: &str) -> ProviderResult<()> {
        self.current_url()?;
        let name = field_name(&self.html, selector)?;

        match self.filled.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.filled.push((name, value.to_string())),
        }
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> ProviderResult<()> {
        let base = self.current_url()?.clone();
        let submission = form_submission(&self.html, selector)?;

        let url = base
            .join(submission.action.as_deref().unwrap_or(""))
            .map_err(|e| ProviderError::protocol(format!("invalid form action: {}", e)))?;
        let fields = merge_fields(submission.defaults, &self.filled);

        self.navigate(PageRequest {
            method: submission.method,
            url,
            fields,
        })
        .await
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> ProviderResult<()> {
        self.current_url()?;

        match tokio::time::timeout(timeout, self.poll_until_present(selector)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::timeout_with_duration(
                format!("waiting for {}", selector),
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }

    async fn text(&mut self, selector: &str) -> ProviderResult<String> {
        self.current_url()?;
        first_text(&self.html, selector)
    }

    async fn close(&mut self) {
        self.closed = true;
        self.last_request = None;
        self.html.clear();
        self.filled.clear();
        tracing::trace!("page session closed");
    }
}

fn parse_selector(selector: &str) -> ProviderResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| ProviderError::protocol(format!("invalid selector {:?}: {}", selector, e)))
}

fn contains(html: &str, selector: &str) -> ProviderResult<bool> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).next().is_some())
}

fn first_text(html: &str, selector: &str) -> ProviderResult<String> {
    let parsed = parse_selector(selector)?;
    let document = Html::parse_document(html);
    document
        .select(&parsed)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .ok_or_else(|| ProviderError::missing_element(selector))
}

fn field_name(html: &str, selector: &str) -> ProviderResult<String> {
    let parsed = parse_selector(selector)?;
    let document = Html::parse_document(html);
    document
        .select(&parsed)
        .next()
        .map(|element| {
            let element = element.value();
            element
                .attr("name")
                .or_else(|| element.attr("id"))
                .unwrap_or(selector)
                .to_string()
        })
        .ok_or_else(|| ProviderError::missing_element(selector))
}

fn form_submission(html: &str, selector: &str) -> ProviderResult<FormSubmission> {
    let parsed = parse_selector(selector)?;
    let inputs = parse_selector("input[name]")?;
    let document = Html::parse_document(html);

    let control = document
        .select(&parsed)
        .next()
        .ok_or_else(|| ProviderError::missing_element(selector))?;
    let form = control
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "form")
        .ok_or_else(|| ProviderError::protocol(format!("{} is not inside a form", selector)))?;

    let method = match form.value().attr("method") {
        Some(m) if m.eq_ignore_ascii_case("post") => FormMethod::Post,
        _ => FormMethod::Get,
    };
    let mut defaults: Vec<(String, String)> = form
        .select(&inputs)
        .filter(|input| {
            !matches!(
                input.value().attr("type"),
                Some("submit" | "button" | "reset")
            )
        })
        .filter_map(|input| {
            let input = input.value();
            let name = input.attr("name")?;
            Some((name.to_string(), input.attr("value").unwrap_or("").to_string()))
        })
        .collect();

    let control = control.value();
    if let Some(name) = control.attr("name") {
        defaults.push((name.to_string(), control.attr("value").unwrap_or("").to_string()));
    }

    Ok(FormSubmission {
        action: form.value().attr("action").map(str::to_string),
        method,
        defaults,
    })
}

fn merge_fields(
    mut fields: Vec<(String, String)>,
    filled: &[(String, String)],
) -> Vec<(String, String)> {
    for (name, value) in filled {
        match fields.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = value.clone(),
            None => fields.push((name.clone(), value.clone())),
        }
    }
    fields
}
