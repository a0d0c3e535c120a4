//! Fixed-window admission decisions for booking attempts.
//!
//! Each client IP gets `max_attempts` bookings per `window_ms`. The counter
//! resets entirely when the window elapses; there is no smoothing over a
//! rolling interval.
//!
//! # Tracing Events
//!
//! - `booking.ratelimit.denied` - booking blocked, window exhausted
//! - `booking.ratelimit.unresolved_ip` - client identity unknown, admitted fail-open
//! - `booking.ratelimit.sweep` - expired records removed by maintenance

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use crate::error::Result;
use crate::store::{AttemptRecord, AttemptStore};
use crate::sweeper::SweeperHandle;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Outcome of a rate limit check.
///
/// Denial is a designed outcome, not an error: the check itself cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The request proceeds and was counted against the active window.
    Admitted {
        /// The configured attempt budget.
        limit: u32,
        /// Attempts left in the window after this one.
        remaining: u32,
        /// Epoch-ms timestamp at which the window ends.
        reset_at: u64,
    },
    /// The window is exhausted; the request must not proceed.
    Denied {
        limit: u32,
        remaining: u32,
        reset_at: u64,
        /// Whole seconds until the window ends, rounded up.
        retry_after_seconds: u64,
    },
    /// Client identity could not be resolved; the request proceeds
    /// untracked (fail-open) and the store is left untouched.
    Unidentified,
}

impl Decision {
    /// Whether the request may proceed.
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Decision::Denied { .. })
    }
}

/// Read-only snapshot of one client's window, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Attempts counted in the window.
    pub attempts: u32,
    /// Attempts left before denial.
    pub remaining: u32,
    /// Epoch-ms timestamp at which the window ends.
    pub reset_at: u64,
}

/// Per-IP fixed-window rate limiter for booking creation.
///
/// Owns the attempt store. Every decision takes the store lock for the
/// whole read-modify-write, so decisions for a given client are atomic
/// even on a multi-threaded runtime; the lock is never held across an
/// `.await`. Cheap to clone — clones share the same store and clock, which
/// is how the middleware layer, an admin surface, and the background
/// sweeper all observe one set of counters.
///
/// # Example
///
/// ```
/// use booking_ratelimit::{BookingRateLimiter, RateLimitConfig};
///
/// let limiter = BookingRateLimiter::new(RateLimitConfig::default())?;
///
/// let decision = limiter.check(Some("203.0.113.9"));
/// assert!(decision.is_admitted());
/// # Ok::<(), booking_ratelimit::RateLimitError>(())
/// ```
#[derive(Clone)]
pub struct BookingRateLimiter {
    store: Arc<Mutex<AttemptStore>>,
    clock: Arc<dyn Clock>,
    config: RateLimitConfig,
}

impl BookingRateLimiter {
    /// Create a limiter with the system clock.
    ///
    /// Rejects a zero attempt budget or a zero-length window.
    pub fn new(config: RateLimitConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a limiter with an explicit time source.
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: Arc::new(Mutex::new(AttemptStore::new())),
            clock,
            config,
        })
    }

    /// The policy this limiter enforces.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Decide whether a booking attempt from `ip` is admitted.
    ///
    /// `None` means the client identity could not be resolved; such
    /// requests are admitted without touching the store, so a
    /// misconfigured proxy can never funnel all traffic into one bucket.
    pub fn check(&self, ip: Option<&str>) -> Decision {
        let Some(ip) = ip else {
            tracing::warn!(
                target: "booking.ratelimit.unresolved_ip",
                "Unable to determine client IP, admitting without rate limit"
            );
            return Decision::Unidentified;
        };

        let max_attempts = self.config.max_attempts;
        let now = self.clock.now_ms();
        let mut store = self.lock_store();

        match store.get(ip).copied() {
            // Window still active. A request landing exactly at `reset_at`
            // counts against the expiring window, not the next one.
            Some(record) if now <= record.reset_at => {
                if record.count >= max_attempts {
                    let retry_after_seconds = (record.reset_at - now).div_ceil(1000);
                    tracing::warn!(
                        target: "booking.ratelimit.denied",
                        ip = %ip,
                        attempts = record.count,
                        retry_after_secs = retry_after_seconds,
                        max_attempts,
                        window_ms = self.config.window_ms,
                        "Booking attempt rate limited"
                    );
                    Decision::Denied {
                        limit: max_attempts,
                        remaining: 0,
                        reset_at: record.reset_at,
                        retry_after_seconds,
                    }
                } else {
                    let count = record.count + 1;
                    store.set(ip, AttemptRecord { count, reset_at: record.reset_at });
                    Decision::Admitted {
                        limit: max_attempts,
                        remaining: max_attempts - count,
                        reset_at: record.reset_at,
                    }
                }
            }
            // First attempt from this client, or its previous window expired.
            _ => {
                let reset_at = now + self.config.window_ms;
                store.set(ip, AttemptRecord { count: 1, reset_at });
                Decision::Admitted {
                    limit: max_attempts,
                    remaining: max_attempts - 1,
                    reset_at,
                }
            }
        }
    }

    /// Read-only snapshot of a client's stored window.
    ///
    /// Never mutates the store and never counts as an attempt. Returns the
    /// record as stored; whether it is still active is the decision path's
    /// concern.
    pub fn status(&self, ip: &str) -> Option<RateLimitStatus> {
        let store = self.lock_store();
        store.get(ip).map(|record| RateLimitStatus {
            attempts: record.count,
            remaining: self.config.max_attempts.saturating_sub(record.count),
            reset_at: record.reset_at,
        })
    }

    /// Forget a single client, e.g. a support override for a blocked user.
    /// The next attempt behaves like a never-seen client.
    pub fn clear(&self, ip: &str) {
        self.lock_store().remove(ip);
    }

    /// Drop every stored window. Intended for test and reset scenarios.
    pub fn clear_all(&self) {
        self.lock_store().clear();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.lock_store().len()
    }

    /// Delete expired records now, returning how many were removed.
    ///
    /// The background sweeper calls this on an interval; it is exposed for
    /// hosts that schedule their own maintenance.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_ms();
        let removed = self.lock_store().sweep(now);
        if removed > 0 {
            tracing::debug!(
                target: "booking.ratelimit.sweep",
                removed,
                "Swept expired rate limit records"
            );
        }
        removed
    }

    /// Spawn the periodic sweep task on the current Tokio runtime.
    ///
    /// The returned handle owns the task; call [`SweeperHandle::shutdown`]
    /// to stop it deterministically. See
    /// [`DEFAULT_SWEEP_INTERVAL`](crate::DEFAULT_SWEEP_INTERVAL) for the
    /// standard cadence.
    pub fn start_sweeper(&self, interval: Duration) -> SweeperHandle {
        SweeperHandle::spawn(self.clone(), interval)
    }

    fn lock_store(&self) -> MutexGuard<'_, AttemptStore> {
        // A poisoned lock cannot leave a record half-written (every store
        // operation is a single map call), so recover the map.
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for BookingRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingRateLimiter")
            .field("config", &self.config)
            .field("tracked_clients", &self.tracked_clients())
            .finish()
    }
}
