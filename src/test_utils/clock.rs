use std::sync::Mutex;

use time::{Duration, OffsetDateTime};

use crate::application::ports::clock::Clock;

/// Clock pinned to an instant that tests move by hand.
pub struct FixedClock {
    now: Mutex<OffsetDateTime>,
}

impl FixedClock {
    pub fn new(at: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(at),
        }
    }

    pub fn set(&self, at: OffsetDateTime) {
        *self.now.lock().unwrap() = at;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> OffsetDateTime {
        *self.now.lock().unwrap()
    }
}
