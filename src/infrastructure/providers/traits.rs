//! # Fare Source Trait
//!
//! Port for live fare retrieval.
//!
//! Every live path (remote API or page scrape) implements [`FareSource`] and
//! returns a [`RawFare`] without interpreting it. Caching, parsing, timeouts
//! and fallback are layered on top by
//! [`ResilientFareAdapter`](crate::infrastructure::providers::adapter::ResilientFareAdapter),
//! so tests can substitute a stub source for any provider.

use crate::domain::entities::RouteRequest;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::error::ProviderResult;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Unparsed fare as delivered by a live source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawFare {
    /// A JSON number.
    Number(f64),
    /// Free text such as `"₹245-300"`.
    Text(String),
    /// The field was absent or null.
    Missing,
}

impl RawFare {
    /// Interprets an optional JSON value.
    ///
    /// # Examples
    ///
    /// ```
    /// use fare_compare::infrastructure::providers::traits::RawFare;
    /// use serde_json::json;
    ///
    /// assert_eq!(RawFare::from_json(Some(&json!(245))), RawFare::Number(245.0));
    /// assert_eq!(RawFare::from_json(Some(&json!("10-12"))), RawFare::Text("10-12".into()));
    /// assert_eq!(RawFare::from_json(None), RawFare::Missing);
    /// ```
    #[must_use]
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_f64().map_or(Self::Missing, Self::Number),
            Some(Value::String(s)) => Self::Text(s.clone()),
            _ => Self::Missing,
        }
    }
}

impl fmt::Display for RawFare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{:?}", s),
            Self::Missing => write!(f, "<missing>"),
        }
    }
}

/// A live fare retrieval path for one provider.
#[async_trait]
pub trait FareSource: Send + Sync + fmt::Debug {
    /// Returns the provider this source prices for.
    fn provider_id(&self) -> &ProviderId;

    /// Returns the upper bound for one retrieval, in milliseconds.
    fn timeout_ms(&self) -> u64;

    /// Fetches the raw fare for `route`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`](crate::infrastructure::providers::error::ProviderError)
    /// on any transport, status or page-structure failure.
    async fn fetch_raw(&self, route: &RouteRequest) -> ProviderResult<RawFare>;
}
