//! # Timestamp Value Object
//!
//! UTC instant used for cache expiry and for stamping fare estimates.
//!
//! # Examples
//!
//! ```
//! use fare_compare::domain::value_objects::timestamp::Timestamp;
//!
//! let issued = Timestamp::from_secs(1_700_000_000).unwrap();
//! let expires = issued.add_secs(1800);
//!
//! assert!(expires.is_after(&issued));
//! assert!(!expires.has_passed(issued));
//! ```

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC instant, serialized as an RFC 3339 string (`lastUpdated`, `createdAt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds, or `None` if out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Returns Unix seconds.
    #[inline]
    #[must_use]
    pub fn unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Moves the instant by `secs`, saturating at the representable range.
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        let limit = if secs < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        };
        Duration::try_seconds(secs)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map_or(Self(limit), Self)
    }

    /// Returns true once `now` has reached this instant.
    ///
    /// Inclusive: an entry whose expiry equals `now` has expired.
    #[inline]
    #[must_use]
    pub fn has_passed(&self, now: Timestamp) -> bool {
        self.0 <= now.0
    }

    /// Returns true if this instant is strictly before `other`.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    /// Returns true if this instant is strictly after `other`.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self(dt.with_timezone(&Utc))
    }
}
