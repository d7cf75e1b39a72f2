// Guard service: the context object owning lists, cache, ledger and stats
// All state is instance-scoped so tests and embedders can run independent
// guards side by side

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::GuardConfig;
use crate::models::{
    GuardCommand, GuardReply, GuardSnapshot, PageSignals, RiskReport, RiskSignal, ScanStats,
    SignalCategory, SnapshotError,
};
use crate::services::analyzer::{AnalysisContext, RiskAnalyzer};
use crate::services::bypass::BypassLedger;
use crate::services::cache::AnalysisCache;
use crate::services::reputation::ReputationProvider;
use crate::services::typosquat::TyposquatDetector;

#[derive(Clone)]
pub struct GuardService {
    config: GuardConfig,
    analyzer: RiskAnalyzer,
    whitelist: Arc<RwLock<HashSet<String>>>,
    blacklist: Arc<RwLock<HashSet<String>>>,
    cache: Arc<RwLock<AnalysisCache>>,
    bypasses: Arc<RwLock<BypassLedger>>,
    stats: Arc<RwLock<ScanStats>>,
    reputation: Option<Arc<dyn ReputationProvider>>,
}

impl Default for GuardService {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardService {
    pub fn new() -> Self {
        Self::with_config(GuardConfig::default())
    }

    pub fn with_config(config: GuardConfig) -> Self {
        let cache = AnalysisCache::new(config.cache_ttl, config.cache_max_entries);
        let bypasses = BypassLedger::new(config.bypass_duration);
        Self {
            config,
            analyzer: RiskAnalyzer::new(),
            whitelist: Arc::new(RwLock::new(HashSet::new())),
            blacklist: Arc::new(RwLock::new(HashSet::new())),
            cache: Arc::new(RwLock::new(cache)),
            bypasses: Arc::new(RwLock::new(bypasses)),
            stats: Arc::new(RwLock::new(ScanStats::default())),
            reputation: None,
        }
    }

    pub fn with_reputation_provider(mut self, provider: Arc<dyn ReputationProvider>) -> Self {
        self.reputation = Some(provider);
        self
    }

    pub fn with_detector(mut self, detector: TyposquatDetector) -> Self {
        self.analyzer = RiskAnalyzer::with_detector(detector);
        self
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    // ============================================
    // ANALYSIS
    // ============================================

    /// Score a URL, serving the cache when allowed.
    ///
    /// A forced call always recomputes and ignores bypasses; that is the
    /// authoritative score for warning pages. Reports produced alongside
    /// page signals are never cached because the observations are not a
    /// function of the URL alone.
    pub async fn analyze_url(
        &self,
        url: &str,
        page_signals: Option<&PageSignals>,
        force: bool,
    ) -> RiskReport {
        let bypass_active = if force {
            false
        } else {
            self.bypasses.write().await.is_active(url)
        };

        let url_keyed = page_signals.is_none();
        if !force && url_keyed && !bypass_active {
            if let Some(cached) = self.cache.write().await.get(url) {
                debug!(url = url, score = cached.score, "serving cached report");
                return cached;
            }
        }

        let mut report = {
            let whitelist = self.whitelist.read().await;
            let blacklist = self.blacklist.read().await;
            let ctx = AnalysisContext::new(&whitelist, &blacklist).bypass_active(bypass_active);
            self.analyzer.analyze(url, page_signals, ctx)
        };

        let battery_scored = !(report.system_page
            || report.legitimate
            || report.whitelisted
            || report.blacklisted
            || report.bypassed
            || report.is_error());

        if battery_scored {
            self.merge_reputation(url, &mut report).await;
        }

        if url_keyed && !report.bypassed && !report.is_error() {
            self.cache.write().await.put(url, report.clone());
        }

        if !report.system_page && !report.bypassed {
            self.stats.write().await.sites_scanned += 1;
        }

        if report.score >= self.config.block_threshold {
            warn!(
                url = url,
                hostname = %report.hostname,
                score = report.score,
                "high risk URL"
            );
        }
        report
    }

    /// Whether the host application should block navigation for a report.
    pub fn should_block(&self, report: &RiskReport) -> bool {
        report.score >= self.config.block_threshold && !report.bypassed
    }

    async fn merge_reputation(&self, url: &str, report: &mut RiskReport) {
        let provider = match &self.reputation {
            Some(provider) => provider,
            None => return,
        };
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => return,
        };

        match tokio::time::timeout(self.config.reputation_timeout, provider.lookup(&parsed)).await
        {
            Ok(Ok(verdict)) => {
                if verdict.is_threat {
                    info!(url = url, source = %verdict.source, "reputation hit");
                    report.signals.push(RiskSignal {
                        reason: format!("CONFIRMED: Flagged by {}", verdict.source),
                        weight: 80,
                        detail: verdict.detail,
                        category: SignalCategory::Reputation,
                    });
                    report.score = (u32::from(report.score) + 80).min(100) as u8;
                }
            }
            Ok(Err(err)) => {
                warn!(url = url, error = %err, "reputation lookup failed");
            }
            Err(_) => {
                warn!(url = url, "reputation lookup timed out");
            }
        }
    }

    // ============================================
    // BYPASSES
    // ============================================

    /// Record a "proceed anyway" decision for this exact URL.
    pub async fn grant_bypass(&self, url: &str) {
        self.bypasses.write().await.grant(url);
        self.stats.write().await.bypasses_used += 1;
    }

    // ============================================
    // USER LISTS
    // ============================================

    pub async fn add_to_whitelist(&self, domain: &str) {
        let domain = domain.to_lowercase();
        self.whitelist.write().await.insert(domain.clone());
        self.purge_domain_state(&domain).await;
        info!(domain = %domain, "added to whitelist");
    }

    pub async fn add_to_blacklist(&self, domain: &str) {
        let domain = domain.to_lowercase();
        self.blacklist.write().await.insert(domain.clone());
        self.purge_domain_state(&domain).await;
        self.stats.write().await.threats_blocked += 1;
        info!(domain = %domain, "added to blacklist");
    }

    pub async fn remove_from_whitelist(&self, domain: &str) {
        let domain = domain.to_lowercase();
        self.whitelist.write().await.remove(&domain);
        self.purge_domain_state(&domain).await;
    }

    pub async fn remove_from_blacklist(&self, domain: &str) {
        let domain = domain.to_lowercase();
        self.blacklist.write().await.remove(&domain);
        self.purge_domain_state(&domain).await;
    }

    pub async fn whitelisted_domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.whitelist.read().await.iter().cloned().collect();
        domains.sort();
        domains
    }

    pub async fn blacklisted_domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.blacklist.read().await.iter().cloned().collect();
        domains.sort();
        domains
    }

    /// A score computed before a list mutation must not be served after it.
    async fn purge_domain_state(&self, domain: &str) {
        let invalidated = self
            .cache
            .write()
            .await
            .invalidate(|_, report| report.hostname == domain);
        let purged = self
            .bypasses
            .write()
            .await
            .purge_matching(|url| url_matches_host(url, domain));
        if invalidated > 0 || purged > 0 {
            debug!(
                domain = domain,
                invalidated = invalidated,
                purged = purged,
                "domain state purged after list mutation"
            );
        }
    }

    // ============================================
    // STATS & MAINTENANCE
    // ============================================

    pub async fn stats(&self) -> ScanStats {
        *self.stats.read().await
    }

    pub async fn cache_size(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn bypass_count(&self) -> usize {
        self.bypasses.read().await.len()
    }

    /// Expire stale cache entries and bypasses. Returns (reports, bypasses)
    /// dropped; the background sweeper calls this on an interval.
    pub async fn sweep(&self) -> (usize, usize) {
        let expired_reports = self.cache.write().await.sweep();
        let expired_bypasses = self.bypasses.write().await.sweep();
        if expired_reports > 0 || expired_bypasses > 0 {
            debug!(
                expired_reports = expired_reports,
                expired_bypasses = expired_bypasses,
                "sweep complete"
            );
        }
        (expired_reports, expired_bypasses)
    }

    // ============================================
    // SNAPSHOTS
    // ============================================

    /// Durable state only: user lists and counters. Cached reports and
    /// bypasses expire on their own and are not exported.
    pub async fn export_snapshot(&self) -> GuardSnapshot {
        let mut whitelist: Vec<String> = self.whitelist.read().await.iter().cloned().collect();
        whitelist.sort();
        let mut blacklist: Vec<String> = self.blacklist.read().await.iter().cloned().collect();
        blacklist.sort();
        GuardSnapshot {
            whitelist,
            blacklist,
            stats: self.stats().await,
        }
    }

    pub async fn import_snapshot(&self, snapshot: GuardSnapshot) {
        let whitelist: HashSet<String> = snapshot
            .whitelist
            .into_iter()
            .map(|domain| domain.to_lowercase())
            .collect();
        let blacklist: HashSet<String> = snapshot
            .blacklist
            .into_iter()
            .map(|domain| domain.to_lowercase())
            .collect();
        let listed: HashSet<String> = whitelist.union(&blacklist).cloned().collect();

        *self.whitelist.write().await = whitelist;
        *self.blacklist.write().await = blacklist;
        *self.stats.write().await = snapshot.stats;

        // Wholesale list replacement invalidates every cached decision
        self.cache.write().await.clear();
        self.bypasses
            .write()
            .await
            .purge_matching(|url| match Url::parse(url) {
                Ok(parsed) => parsed
                    .host_str()
                    .map(|host| listed.contains(host))
                    .unwrap_or(false),
                Err(_) => false,
            });
        info!("snapshot imported");
    }

    pub async fn export_snapshot_json(&self) -> Result<String, SnapshotError> {
        self.export_snapshot().await.to_json()
    }

    pub async fn import_snapshot_json(&self, payload: &str) -> Result<(), SnapshotError> {
        let snapshot = GuardSnapshot::from_json(payload)?;
        self.import_snapshot(snapshot).await;
        Ok(())
    }

    // ============================================
    // COMMAND DISPATCH
    // ============================================

    /// Single entry point for transport-framed callers.
    pub async fn execute(&self, command: GuardCommand) -> GuardReply {
        match command {
            GuardCommand::AnalyzeUrl {
                url,
                page_signals,
                force_analysis,
            } => GuardReply::Report(
                self.analyze_url(&url, page_signals.as_ref(), force_analysis)
                    .await,
            ),
            GuardCommand::SetTemporaryBypass { url } => {
                self.grant_bypass(&url).await;
                GuardReply::Acknowledged
            }
            GuardCommand::AddToWhitelist { domain } => {
                self.add_to_whitelist(&domain).await;
                GuardReply::Acknowledged
            }
            GuardCommand::AddToBlacklist { domain } => {
                self.add_to_blacklist(&domain).await;
                GuardReply::Acknowledged
            }
            GuardCommand::GetStats => GuardReply::Stats(self.stats().await),
        }
    }
}

fn url_matches_host(url: &str, hostname: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .host_str()
                .map(|host| host.eq_ignore_ascii_case(hostname))
        })
        .unwrap_or(false)
}
