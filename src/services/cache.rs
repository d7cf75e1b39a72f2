// Time-bounded memoization of analysis results keyed by URL
// Expired entries are dropped on read; capacity pressure evicts oldest first

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::RiskReport;

struct CacheEntry {
    report: RiskReport,
    created_at: Instant,
}

/// Not synchronized; the owning service serializes access.
pub struct AnalysisCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
}

impl AnalysisCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        debug_assert!(!ttl.is_zero(), "cache TTL must be non-zero");
        debug_assert!(max_entries > 0, "cache capacity must be non-zero");
        Self {
            entries: HashMap::new(),
            ttl,
            max_entries,
        }
    }

    /// Fresh entry for the exact URL, if any. Stale entries are removed
    /// here rather than waiting for the next sweep.
    pub fn get(&mut self, url: &str) -> Option<RiskReport> {
        let expired = match self.entries.get(url) {
            Some(entry) => entry.created_at.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            self.entries.remove(url);
            return None;
        }
        self.entries.get(url).map(|entry| entry.report.clone())
    }

    pub fn put(&mut self, url: impl Into<String>, report: RiskReport) {
        self.entries.insert(
            url.into(),
            CacheEntry {
                report,
                created_at: Instant::now(),
            },
        );
        self.enforce_capacity();
    }

    /// Targeted removal, e.g. every entry for a newly listed hostname.
    /// Returns how many entries were dropped.
    pub fn invalidate<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&str, &RiskReport) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|url, entry| !predicate(url, &entry.report));
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed = removed, "cache entries invalidated");
        }
        removed
    }

    /// Bulk expiry plus capacity enforcement. Returns how many entries
    /// were dropped.
    pub fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| entry.created_at.elapsed() < ttl);
        self.enforce_capacity();
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn enforce_capacity(&mut self) {
        while self.entries.len() > self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(url, _)| url.clone());
            match oldest {
                Some(url) => {
                    self.entries.remove(&url);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn report_for(hostname: &str, score: u8) -> RiskReport {
        let mut report = RiskReport::new(hostname, "https");
        report.score = score;
        report
    }

    #[test]
    fn test_get_returns_fresh_entries() {
        let mut cache = AnalysisCache::new(Duration::from_secs(300), 200);
        assert!(cache.get("https://a.com/").is_none());

        cache.put("https://a.com/", report_for("a.com", 42));
        let hit = cache.get("https://a.com/").expect("entry should be fresh");
        assert_eq!(hit.score, 42);
        assert_eq!(hit.hostname, "a.com");
    }

    #[test]
    fn test_expired_entries_are_removed_on_read() {
        let mut cache = AnalysisCache::new(Duration::from_millis(10), 200);
        cache.put("https://a.com/", report_for("a.com", 42));
        cache.put("https://b.com/", report_for("b.com", 7));

        sleep(Duration::from_millis(30));

        assert!(cache.get("https://a.com/").is_none());
        // Only the read key is purged eagerly
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let mut cache = AnalysisCache::new(Duration::from_secs(300), 2);

        cache.put("https://a.com/", report_for("a.com", 1));
        sleep(Duration::from_millis(5));
        cache.put("https://b.com/", report_for("b.com", 2));
        sleep(Duration::from_millis(5));
        cache.put("https://c.com/", report_for("c.com", 3));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("https://a.com/").is_none());
        assert!(cache.get("https://b.com/").is_some());
        assert!(cache.get("https://c.com/").is_some());
    }

    #[test]
    fn test_invalidate_by_hostname() {
        let mut cache = AnalysisCache::new(Duration::from_secs(300), 200);
        cache.put("https://evil.tk/a", report_for("evil.tk", 80));
        cache.put("https://evil.tk/b", report_for("evil.tk", 75));
        cache.put("https://fine.com/", report_for("fine.com", 5));

        let removed = cache.invalidate(|_, report| report.hostname == "evil.tk");
        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("https://fine.com/").is_some());
    }

    #[test]
    fn test_sweep_drops_expired_entries() {
        let mut cache = AnalysisCache::new(Duration::from_millis(10), 200);
        cache.put("https://a.com/", report_for("a.com", 1));
        cache.put("https://b.com/", report_for("b.com", 2));

        sleep(Duration::from_millis(30));
        cache.put("https://c.com/", report_for("c.com", 3));

        let removed = cache.sweep();
        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("https://c.com/").is_some());
    }

    #[test]
    fn test_put_overwrites_existing_key() {
        let mut cache = AnalysisCache::new(Duration::from_secs(300), 200);
        cache.put("https://a.com/", report_for("a.com", 10));
        cache.put("https://a.com/", report_for("a.com", 90));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("https://a.com/").unwrap().score, 90);
    }
}
