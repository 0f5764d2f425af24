// Time Provider Port (for testability)

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;

    /// Wall-clock time in the deployment's configured zone
    ///
    /// Drives "today's weekday" and the daily trigger times.
    fn local_now(&self) -> NaiveDateTime;
}

/// System time provider (production)
pub struct SystemTimeProvider {
    zone: Tz,
}

impl SystemTimeProvider {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.zone).naive_local()
    }
}

pub mod mocks {
    use super::*;

    /// Clock frozen at a fixed local time
    pub struct FixedTimeProvider {
        now: NaiveDateTime,
    }

    impl FixedTimeProvider {
        pub fn new(now: NaiveDateTime) -> Self {
            Self { now }
        }
    }

    impl TimeProvider for FixedTimeProvider {
        fn now_millis(&self) -> i64 {
            self.now.and_utc().timestamp_millis()
        }

        fn local_now(&self) -> NaiveDateTime {
            self.now
        }
    }
}
