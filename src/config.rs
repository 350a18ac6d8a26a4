//! # Settings
//!
//! Layered process configuration.
//!
//! Sources, lowest priority first:
//!
//! 1. `config/default.toml`, compiled into the binary
//! 2. an optional file passed on the command line
//! 3. `FARE__SECTION__KEY` environment variables
//!
//! The merged result is validated before anything is built from it.

use crate::application::services::AggregationConfig;
use crate::domain::entities::{Credentials, ProviderConfig, ProviderRegistry};
use crate::domain::services::surge::SurgeConfig;
use crate::domain::value_objects::{LiveSource, VehicleType};
use crate::infrastructure::providers::scrape::ScrapeConfig;
use ::config::builder::{ConfigBuilder, DefaultState};
use ::config::{Environment, FileFormat};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FARE";

/// Default bound on one remote API call in milliseconds.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 5_000;

/// Settings errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// The merged settings are unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Listen address, `host:port`.
    pub bind: String,
}

/// Log output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Output encoding.
    #[serde(default)]
    pub format: LogFormat,
    /// `EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: String,
}

/// Result cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Lifetime of a cached fare in seconds.
    pub ttl_secs: u64,
}

/// One `[[providers]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider id.
    pub id: String,
    /// Name shown to riders.
    pub display_name: String,
    /// Fallback base fare.
    pub fallback_base_price: f64,
    /// Fallback rate per kilometre.
    pub fallback_per_km_rate: f64,
    /// Vehicle class.
    #[serde(default)]
    pub vehicle_type: VehicleType,
    /// Live retrieval path.
    #[serde(default)]
    pub live_source: LiveSource,
    /// API base URL or page URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Environment variable holding the API credential.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Bound on one remote API call in milliseconds.
    #[serde(default = "default_api_timeout_ms")]
    pub api_timeout_ms: u64,
}

fn default_api_timeout_ms() -> u64 {
    DEFAULT_API_TIMEOUT_MS
}

impl ProviderSettings {
    /// Builds the domain configuration, resolving the credential with `lookup`.
    ///
    /// A named but unset credential variable leaves the provider without
    /// credentials; its adapter then falls back on every call.
    #[must_use]
    pub fn to_provider_config<F>(&self, lookup: F) -> ProviderConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut provider = ProviderConfig::new(
            self.id.as_str(),
            self.display_name.as_str(),
            self.fallback_base_price,
            self.fallback_per_km_rate,
        )
        .with_vehicle_type(self.vehicle_type);

        if let Some(endpoint) = &self.endpoint {
            provider = provider.with_live_source(self.live_source, endpoint.as_str());
        }
        if let Some(key) = self.api_key_env.as_deref().and_then(&lookup) {
            provider = provider.with_credentials(Credentials::api_key(key));
        }
        provider
    }
}

/// Complete process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP listener.
    pub server: ServerSettings,
    /// Logging.
    pub logging: LoggingSettings,
    /// Result cache.
    pub cache: CacheSettings,
    /// Aggregation tunables.
    #[serde(default)]
    pub aggregation: AggregationConfig,
    /// Surge model.
    #[serde(default)]
    pub surge: SurgeConfig,
    /// Scraping adapter.
    #[serde(default)]
    pub scrape: ScrapeConfig,
    /// Providers in configuration order.
    pub providers: Vec<ProviderSettings>,
}

impl Settings {
    /// Loads defaults, then `path` if given, then the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source is unreadable and
    /// [`ConfigError::Invalid`] if the result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = defaults_builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        Self::build(builder.add_source(environment()))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks everything that can be checked without I/O.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::invalid("cache.ttl_secs must be positive"));
        }
        if self.aggregation.per_provider_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "aggregation.per_provider_timeout_ms must be positive",
            ));
        }
        if self.scrape.poll_interval_ms == 0 {
            return Err(ConfigError::invalid("scrape.poll_interval_ms must be positive"));
        }
        let scrape_bound = self
            .scrape
            .navigation_timeout_ms
            .saturating_mul(2)
            .saturating_add(self.scrape.element_timeout_ms);
        if self.aggregation.per_provider_timeout_ms < scrape_bound {
            return Err(ConfigError::invalid(format!(
                "aggregation.per_provider_timeout_ms must be at least {} to cover a scrape",
                scrape_bound
            )));
        }
        self.surge
            .validate()
            .map_err(|e| ConfigError::invalid(format!("surge: {}", e)))?;
        if let Some(provider) = self.providers.iter().find(|p| p.api_timeout_ms == 0) {
            return Err(ConfigError::invalid(format!(
                "{}: api_timeout_ms must be positive",
                provider.id
            )));
        }
        self.registry(|_| None)?;
        Ok(())
    }

    /// Parses `server.bind`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if it is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind.parse::<SocketAddr>().map_err(|e| {
            ConfigError::invalid(format!("server.bind {:?}: {}", self.server.bind, e))
        })
    }

    /// Builds the provider registry, resolving credentials with `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the list is empty, an id repeats or a
    /// provider is malformed.
    pub fn registry<F>(&self, lookup: F) -> Result<ProviderRegistry, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let providers = self
            .providers
            .iter()
            .map(|p| p.to_provider_config(&lookup))
            .collect();
        ProviderRegistry::new(providers).map_err(|e| ConfigError::invalid(e.to_string()))
    }

    /// Returns the settings entry for `id`.
    #[must_use]
    pub fn provider(&self, id: &str) -> Option<&ProviderSettings> {
        self.providers.iter().find(|p| p.id == id)
    }
}

fn defaults_builder() -> ConfigBuilder<DefaultState> {
    ::config::Config::builder().add_source(::config::File::from_str(
        DEFAULT_CONFIG_TOML,
        FileFormat::Toml,
    ))
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
