use chrono::{DateTime, Utc};

/// Capability for obtaining the current time.
///
/// The token service takes its clock through this trait so expiry checks
/// can be tested against fixed instants instead of the wall clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
