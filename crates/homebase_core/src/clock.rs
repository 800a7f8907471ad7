//! Identifier and time sources.
//!
//! # Responsibility
//! - Generate opaque unique entity ids.
//! - Provide the wall clock used for timestamps, week computation and
//!   debounce deadlines, behind a trait so tests can drive time by hand.
//!
//! # Invariants
//! - Ids are never reused; the store treats them as opaque strings.
//! - `Clock::today()` is the user's calendar date, not necessarily the UTC date.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Returns a fresh entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Time source used by the store.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date as seen by the user.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real clock. `today()` follows the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Hand-driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Starts at midnight UTC of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    pub fn advance(&self, delta: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard += delta;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut guard = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::{new_id, Clock, ManualClock};
    use chrono::{Duration, NaiveDate};
    use std::collections::HashSet;

    #[test]
    fn new_id_is_unique() {
        let ids = (0..64).map(|_| new_id()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::at_date(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        let other = clock.clone();
        clock.advance(Duration::days(2));
        assert_eq!(other.today(), NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
    }
}
