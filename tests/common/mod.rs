// Common test utilities and helper structs
// Shared across all test files to avoid duplication

use std::time::Duration;

use async_trait::async_trait;
use phishguard_core::{GuardConfig, GuardService, ReputationProvider, ReputationVerdict};
use url::Url;

/// Config with aggressively short expiries so tests do not wait.
pub fn test_config() -> GuardConfig {
    GuardConfig::new()
        .with_cache_ttl(Duration::from_millis(40))
        .with_bypass_duration(Duration::from_millis(40))
        .with_sweep_interval(Duration::from_millis(25))
        .with_reputation_timeout(Duration::from_millis(50))
}

pub fn short_lived_service() -> GuardService {
    GuardService::with_config(test_config())
}

/// Reputation provider that stalls for a fixed delay before answering.
pub struct StalledProvider {
    pub delay: Duration,
}

#[async_trait]
impl ReputationProvider for StalledProvider {
    async fn lookup(&self, _url: &Url) -> anyhow::Result<ReputationVerdict> {
        tokio::time::sleep(self.delay).await;
        Ok(ReputationVerdict::clean("stalled-feed"))
    }
}

/// Reputation provider that always fails.
pub struct BrokenProvider;

#[async_trait]
impl ReputationProvider for BrokenProvider {
    async fn lookup(&self, _url: &Url) -> anyhow::Result<ReputationVerdict> {
        anyhow::bail!("feed unreachable")
    }
}
