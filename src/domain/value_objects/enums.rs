//! # Domain Enums
//!
//! Enumeration types for fare domain concepts.
//!
//! - [`DataSource`] - Whether a fare came from a live source or the fallback model
//! - [`VehicleType`] - The kind of vehicle a provider dispatches
//! - [`LiveSource`] - Which live retrieval path, if any, a provider uses
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Origin of the number carried in a fare estimate.
///
/// # Examples
///
/// ```
/// use fare_compare::domain::value_objects::enums::DataSource;
///
/// assert!(DataSource::Live.is_live());
/// assert_eq!(DataSource::Estimated.to_string(), "Estimated");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    /// The provider's own live path produced the fare.
    Live,
    /// The fare was computed by the fallback pricing model.
    Estimated,
}

impl DataSource {
    /// Returns true if the fare came from a live source.
    #[inline]
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "Live"),
            Self::Estimated => write!(f, "Estimated"),
        }
    }
}

impl FromStr for DataSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LIVE" | "API/LIVE" => Ok(Self::Live),
            "ESTIMATED" => Ok(Self::Estimated),
            _ => Err(ParseEnumError::InvalidValue("DataSource", s.to_string())),
        }
    }
}

/// Vehicle class a provider dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VehicleType {
    /// Four-wheeled cab.
    #[default]
    #[serde(rename = "Car", alias = "car")]
    Car,
    /// Two-wheeler (bike taxi).
    #[serde(rename = "Bike", alias = "bike")]
    Bike,
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Car => write!(f, "Car"),
            Self::Bike => write!(f, "Bike"),
        }
    }
}

impl FromStr for VehicleType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CAR" | "CAB" => Ok(Self::Car),
            "BIKE" | "TWO_WHEELER" => Ok(Self::Bike),
            _ => Err(ParseEnumError::InvalidValue("VehicleType", s.to_string())),
        }
    }
}

/// Live retrieval path of a provider.
///
/// Providers with [`LiveSource::None`] are priced by the fallback model only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveSource {
    /// Remote estimates API answering with a `prices` list.
    UberApi,
    /// Remote products API answering with a `fare_breakup` object.
    OlaApi,
    /// Fare-calculator web page driven through a page session.
    RapidoScrape,
    /// No live source.
    #[default]
    None,
}

impl LiveSource {
    /// Returns true if the provider has a live retrieval path.
    #[inline]
    #[must_use]
    pub const fn is_live(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for LiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UberApi => "uber_api",
            Self::OlaApi => "ola_api",
            Self::RapidoScrape => "rapido_scrape",
            Self::None => "none",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for LiveSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uber_api" => Ok(Self::UberApi),
            "ola_api" => Ok(Self::OlaApi),
            "rapido_scrape" => Ok(Self::RapidoScrape),
            "none" => Ok(Self::None),
            _ => Err(ParseEnumError::InvalidValue("LiveSource", s.to_string())),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}
