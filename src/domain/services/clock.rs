//! # Clock
//!
//! Injectable source of "now".
//!
//! The surge calculator needs local wall-clock hours and weekdays, and the
//! result cache needs an instant to compare expiries against. Both read the
//! same [`Clock`] so tests can pin or advance time.

use crate::domain::value_objects::Timestamp;
use chrono::{DateTime, FixedOffset, Local};
use parking_lot::Mutex;
use std::fmt;

/// Source of the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current local time with its UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Returns the current instant as a [`Timestamp`].
    fn timestamp(&self) -> Timestamp {
        self.now().into()
    }
}

/// Wall clock in the process's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a system clock.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let now = Local::now();
        now.with_timezone(now.offset())
    }
}

/// Clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use fare_compare::domain::services::clock::{Clock, ManualClock};
///
/// let ist = FixedOffset::east_opt(19_800).unwrap();
/// let clock = ManualClock::new(ist.with_ymd_and_hms(2024, 3, 6, 9, 0, 0).unwrap());
/// clock.advance_secs(3600);
///
/// assert_eq!(clock.now().format("%H:%M").to_string(), "10:00");
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    #[must_use]
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward (or back, for negative values).
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock();
        *now += chrono::Duration::seconds(secs);
    }

    /// Jumps to an absolute time.
    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_advances() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let clock = ManualClock::new(utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let start = clock.timestamp();

        clock.advance_secs(1800);
        assert_eq!(clock.timestamp().unix_secs() - start.unix_secs(), 1800);
    }

    #[test]
    fn system_clock_matches_utc_instant() {
        let before = Timestamp::now();
        let now = SystemClock::new().timestamp();
        let after = Timestamp::now();
        assert!(!now.is_before(&before));
        assert!(!now.is_after(&after));
    }
}
