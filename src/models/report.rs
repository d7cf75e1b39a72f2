// Report types produced by the risk analyzer
// The score is clamped to 0-100; signals are additive and unordered

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which family of check produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Protocol,
    Host,
    Typosquatting,
    Tld,
    Structure,
    Keyword,
    Port,
    Shortener,
    PageContent,
    Reputation,
    UserList,
}

/// One contributing factor in a risk report. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSignal {
    pub reason: String,
    pub weight: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub category: SignalCategory,
}

impl RiskSignal {
    pub fn new(reason: impl Into<String>, weight: u8, category: SignalCategory) -> Self {
        Self {
            reason: reason.into(),
            weight,
            detail: None,
            category,
        }
    }

    pub fn with_detail(
        reason: impl Into<String>,
        weight: u8,
        detail: impl Into<String>,
        category: SignalCategory,
    ) -> Self {
        Self {
            reason: reason.into(),
            weight,
            detail: Some(detail.into()),
            category,
        }
    }
}

/// Result of one analysis. Created fresh per call; the owning service may
/// merge reputation signals in after the heuristic battery has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub score: u8,
    pub signals: Vec<RiskSignal>,
    pub hostname: String,
    pub protocol: String,
    #[serde(default)]
    pub legitimate: bool,
    #[serde(default)]
    pub whitelisted: bool,
    #[serde(default)]
    pub blacklisted: bool,
    #[serde(default)]
    pub bypassed: bool,
    #[serde(default)]
    pub system_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl RiskReport {
    /// Empty report skeleton; the analyzer fills in score and signals.
    pub fn new(hostname: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            score: 0,
            signals: Vec::new(),
            hostname: hostname.into(),
            protocol: protocol.into(),
            legitimate: false,
            whitelisted: false,
            blacklisted: false,
            bypassed: false,
            system_page: false,
            error: None,
            analyzed_at: Utc::now(),
        }
    }

    pub fn threat_level(&self) -> ThreatLevel {
        ThreatLevel::from_score(self.score)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Sum of the weights of signals in a given category. Test and display
    /// helper; the authoritative score is the clamped `score` field.
    pub fn category_weight(&self, category: SignalCategory) -> u32 {
        self.signals
            .iter()
            .filter(|s| s.category == category)
            .map(|s| s.weight as u32)
            .sum()
    }

    pub fn has_category(&self, category: SignalCategory) -> bool {
        self.signals.iter().any(|s| s.category == category)
    }
}

/// Coarse classification of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    Safe,     // 0-19
    Warning,  // 20-49
    Danger,   // 50-74
    Critical, // 75-100
}

impl ThreatLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=19 => ThreatLevel::Safe,
            20..=49 => ThreatLevel::Warning,
            50..=74 => ThreatLevel::Danger,
            _ => ThreatLevel::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Safe => "safe",
            ThreatLevel::Warning => "warning",
            ThreatLevel::Danger => "danger",
            ThreatLevel::Critical => "critical",
        }
    }
}
