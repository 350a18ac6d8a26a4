//! # Provider Fare
//!
//! A fare amount together with where it came from.

use crate::domain::value_objects::enums::DataSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-unit fare tagged with its provenance.
///
/// # Examples
///
/// ```
/// use fare_compare::domain::value_objects::fare::ProviderFare;
///
/// let fare = ProviderFare::live(245);
/// assert!(fare.is_live());
/// assert_eq!(ProviderFare::estimated(310).amount(), 310);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderFare {
    amount: u64,
    source: DataSource,
}

impl ProviderFare {
    /// A fare produced by the provider's live path.
    #[must_use]
    pub const fn live(amount: u64) -> Self {
        Self {
            amount,
            source: DataSource::Live,
        }
    }

    /// A fare produced by the fallback model.
    #[must_use]
    pub const fn estimated(amount: u64) -> Self {
        Self {
            amount,
            source: DataSource::Estimated,
        }
    }

    /// Returns the amount.
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.amount
    }

    /// Returns the provenance.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> DataSource {
        self.source
    }

    /// Returns true if the amount came from a live source.
    #[inline]
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.source.is_live()
    }
}

impl fmt::Display for ProviderFare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.amount, self.source)
    }
}
