//! Background sweep of expired attempt records.
//!
//! Without maintenance the store grows by one entry per distinct client IP
//! seen; the sweep deletes records whose window has ended, on a fixed
//! cadence independent of request traffic.

use crate::limiter::BookingRateLimiter;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Standard sweep cadence: every 5 minutes.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Handle owning the periodic sweep task.
///
/// One repeating timer per handle; ticks run sequentially inside a single
/// task, so a sweep can never overlap itself. Dropping the handle without
/// calling [`shutdown`](Self::shutdown) leaves the task running for the
/// life of the runtime.
pub struct SweeperHandle {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    pub(crate) fn spawn(limiter: BookingRateLimiter, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick of an interval completes immediately; consume
            // it so a freshly started limiter is not swept at startup.
            ticker.tick().await;

            tracing::debug!(
                target: "booking.ratelimit.sweeper",
                interval_secs = interval.as_secs(),
                "Sweeper started"
            );

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => break,
                    _ = ticker.tick() => {
                        limiter.sweep();
                    }
                }
            }

            tracing::debug!(target: "booking.ratelimit.sweeper", "Sweeper stopped");
        });

        Self { shutdown_tx, handle }
    }

    /// Stop the sweep task and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.handle.await;
    }
}
