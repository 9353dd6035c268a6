use time::OffsetDateTime;

/// Source of the current instant.
///
/// Token issuing and expiry checks read time only through this port so tests
/// can pin or advance the clock.
pub trait Clock: Send + Sync {
    /// Current instant, always in UTC.
    fn now_utc(&self) -> OffsetDateTime;
}
