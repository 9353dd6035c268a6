use time::OffsetDateTime;

use crate::application::ports::clock::Clock;

/// Wall clock of the host, read in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
