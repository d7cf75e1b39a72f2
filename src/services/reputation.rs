// Pluggable reputation lookups (PhishTank, Safe Browsing and friends)
// The core never owns the client logic; a missing or failing provider
// degrades to "no signal"

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

/// Outcome of one reputation query.
#[derive(Debug, Clone, PartialEq)]
pub struct ReputationVerdict {
    pub is_threat: bool,
    /// Human-readable service name, used in the signal text.
    pub source: String,
    pub detail: Option<String>,
}

impl ReputationVerdict {
    pub fn clean(source: impl Into<String>) -> Self {
        Self {
            is_threat: false,
            source: source.into(),
            detail: None,
        }
    }

    pub fn threat(source: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            is_threat: true,
            source: source.into(),
            detail: Some(detail.into()),
        }
    }
}

/// Implemented by host applications that can reach a reputation service.
/// Errors are logged and swallowed by the caller; they must not take the
/// whole analysis down with them.
#[async_trait]
pub trait ReputationProvider: Send + Sync {
    async fn lookup(&self, url: &Url) -> Result<ReputationVerdict>;
}

/// In-memory provider backed by a fixed set of flagged hostnames.
/// Useful in tests and offline deployments.
pub struct StaticReputationProvider {
    source: String,
    flagged_hosts: HashSet<String>,
}

impl StaticReputationProvider {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flagged_hosts: HashSet::new(),
        }
    }

    pub fn flag_host(mut self, hostname: impl Into<String>) -> Self {
        self.flagged_hosts.insert(hostname.into().to_lowercase());
        self
    }
}

#[async_trait]
impl ReputationProvider for StaticReputationProvider {
    async fn lookup(&self, url: &Url) -> Result<ReputationVerdict> {
        let hostname = url.host_str().unwrap_or("").to_lowercase();
        if self.flagged_hosts.contains(&hostname) {
            Ok(ReputationVerdict::threat(
                self.source.clone(),
                format!("{} is a known phishing host", hostname),
            ))
        } else {
            Ok(ReputationVerdict::clean(self.source.clone()))
        }
    }
}
