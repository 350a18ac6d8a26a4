//! # Telemetry
//!
//! Installs the global `tracing` subscriber.

use crate::config::{LogFormat, LoggingSettings};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Directives used when neither `RUST_LOG` nor the settings give any.
pub const DEFAULT_FILTER: &str = "info,fare_compare=debug";

/// Builds the filter: `RUST_LOG` first, then the configured directives.
#[must_use]
pub fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the subscriber for the process.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init(settings: &LoggingSettings) -> Result<(), tracing_subscriber::util::TryInitError> {
    let registry = tracing_subscriber::registry().with(env_filter(settings));
    match settings.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_directives_fall_back_to_default() {
        let settings = LoggingSettings {
            format: LogFormat::Pretty,
            filter: "fare_compare=[".to_string(),
        };
        // RUST_LOG may be set by the test runner; either way a filter is built.
        let filter = env_filter(&settings);
        assert!(!filter.to_string().is_empty());
    }
}
