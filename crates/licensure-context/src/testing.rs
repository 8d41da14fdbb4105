//! Shared test fixtures, compiled only under `cfg(test)`.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::clock::Clock;

/// A clock a test can pin to an exact instant.
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    /// Construct a clock fixed at `instant`.
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(Mutex::new(instant))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}
