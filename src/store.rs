//! In-process attempt bookkeeping.
//!
//! Stores per-client attempt counters in a HashMap. Suitable for a single
//! process only: each instance counts independently, so running several
//! replicas multiplies the effective limit. Deployments that need a shared
//! budget must move this state into an external keyed counter.

use std::collections::HashMap;

/// Attempt counter and window expiry for one client.
///
/// A stored record always has `count >= 1` and a `reset_at` that was in the
/// future when the record was last written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    /// Attempts counted within the current window.
    pub count: u32,
    /// Epoch-ms timestamp at which the current window ends.
    pub reset_at: u64,
}

/// Map from client id to attempt record.
///
/// Plain single-owner map with synchronous total operations; the limiter
/// serializes access so a read-modify-write on one key cannot interleave
/// with another decision for the same key.
#[derive(Debug, Default)]
pub struct AttemptStore {
    entries: HashMap<String, AttemptRecord>,
}

impl AttemptStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the record for a client.
    pub fn get(&self, client_id: &str) -> Option<&AttemptRecord> {
        self.entries.get(client_id)
    }

    /// Insert or overwrite the record for a client.
    pub fn set(&mut self, client_id: impl Into<String>, record: AttemptRecord) {
        self.entries.insert(client_id.into(), record);
    }

    /// Remove the record for a client, if any.
    pub fn remove(&mut self, client_id: &str) {
        self.entries.remove(client_id);
    }

    /// Delete every record whose window has ended (`reset_at <= now_ms`).
    ///
    /// Returns how many records were removed.
    pub fn sweep(&mut self, now_ms: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, record| record.reset_at > now_ms);
        before - self.entries.len()
    }

    /// Drop every stored record.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of clients currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
