//! Wall-clock source.
//!
//! Everything time-dependent in the core reads the clock through this trait so
//! tests can move time forward without sleeping.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Shared handle used by the stores and the tracker.
pub type SharedClock = Rc<dyn Clock>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.now.set(at);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Start of the local calendar day containing `at`, in UTC.
pub fn start_of_local_day(at: DateTime<Utc>) -> DateTime<Utc> {
    let local = at.with_timezone(&Local);
    let midnight = local.date_naive().and_hms_opt(0, 0, 0).unwrap_or_default();
    match Local.from_local_datetime(&midnight).earliest() {
        Some(start) => start.with_timezone(&Utc),
        // Midnight skipped by a DST change; the day starts at the first valid instant.
        None => Local
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .map(|start| start.with_timezone(&Utc))
            .unwrap_or(at),
    }
}

/// Milliseconds since the Unix epoch.
pub fn epoch_ms(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub fn from_epoch_ms(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}
