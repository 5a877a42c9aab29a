use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use parking_lot::Mutex;

use crate::error::{QuoteBookError, Result};

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Source of the current time for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Parses a naive date-time string as UTC.
pub fn parse_timestamp(value: &str, format: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, format)
        .map(|naive| naive.and_utc())
        .map_err(|source| QuoteBookError::InvalidTimestamp {
            value: value.to_string(),
            format: format.to_string(),
            source,
        })
}
