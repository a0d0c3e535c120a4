//! Time sources for window bookkeeping.
//!
//! The limiter works in milliseconds since the Unix epoch because the HTTP
//! contract exposes absolute `X-RateLimit-Reset` timestamps. `SystemClock`
//! is the production implementation; `MockClock` lets tests control time
//! progression explicitly.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync + Debug {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Wall-clock implementation backed by `SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64
    }
}

/// Controllable clock for tests.
///
/// Clones share the same underlying time value, so a clock handed to a
/// limiter can still be advanced from the test body:
///
/// ```
/// use booking_ratelimit::{Clock, MockClock};
/// use std::time::Duration;
///
/// let clock = MockClock::new(1_000);
/// assert_eq!(clock.now_ms(), 1_000);
///
/// clock.advance(Duration::from_secs(10));
/// assert_eq!(clock.now_ms(), 11_000);
///
/// clock.set_ms(500_000);
/// assert_eq!(clock.now_ms(), 500_000);
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    now_ms: Arc<Mutex<u64>>,
}

impl MockClock {
    /// Create a mock clock starting at the given epoch-ms timestamp.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(Mutex::new(start_ms)),
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, by: Duration) {
        let mut now = self
            .now_ms
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        *now += by.as_millis() as u64;
    }

    /// Set the clock to a specific epoch-ms timestamp.
    pub fn set_ms(&self, now_ms: u64) {
        let mut now = self
            .now_ms
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        *now = now_ms;
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        *self
            .now_ms
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock::new();
        let t1 = clock.now_ms();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = clock.now_ms();

        assert!(t2 > t1);
    }

    #[test]
    fn test_mock_clock_shared_across_clones() {
        let clock = MockClock::new(0);
        let clone = clock.clone();

        clone.advance(Duration::from_secs(5));
        assert_eq!(clock.now_ms(), 5_000);
    }
}
