// Temporary user-granted bypasses, keyed by exact URL
// A bypass never outlives its grant window; stale records are purged on
// read and by the periodic sweep

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info};

/// Not synchronized; the owning service serializes access.
pub struct BypassLedger {
    records: HashMap<String, Instant>,
    duration: Duration,
}

impl BypassLedger {
    pub fn new(duration: Duration) -> Self {
        debug_assert!(!duration.is_zero(), "bypass duration must be non-zero");
        Self {
            records: HashMap::new(),
            duration,
        }
    }

    /// Record a "proceed anyway" decision for this exact URL. Granting
    /// again restarts the window.
    pub fn grant(&mut self, url: impl Into<String>) {
        let url = url.into();
        info!(url = %url, "temporary bypass granted");
        self.records.insert(url, Instant::now());
    }

    /// True while an unexpired record exists. Stale records are removed
    /// here rather than waiting for the next sweep.
    pub fn is_active(&mut self, url: &str) -> bool {
        let expired = match self.records.get(url) {
            Some(granted_at) => granted_at.elapsed() >= self.duration,
            None => return false,
        };
        if expired {
            self.records.remove(url);
            return false;
        }
        true
    }

    /// Bulk expiry. Returns how many records were dropped.
    pub fn sweep(&mut self) -> usize {
        let before = self.records.len();
        let duration = self.duration;
        self.records
            .retain(|_, granted_at| granted_at.elapsed() < duration);
        let removed = before - self.records.len();
        if removed > 0 {
            debug!(removed = removed, "expired bypasses swept");
        }
        removed
    }

    /// Drop records whose URL matches, e.g. after a list mutation for the
    /// URL's hostname. Returns how many records were dropped.
    pub fn purge_matching<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|url, _| !predicate(url));
        before - self.records.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
