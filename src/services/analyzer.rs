// URL risk scoring engine
// Ordered battery of heuristic checks producing a clamped 0-100 score
// with itemized reasons

use std::collections::HashSet;

use tracing::{debug, warn};
use url::Url;

use crate::models::{PageSignals, RiskReport, RiskSignal, SignalCategory};
use crate::services::typosquat::TyposquatDetector;
use crate::utils::hostname::{is_idn_host, is_ip_literal};

// ============================================
// STATIC CATALOGS
// ============================================

/// Domains trusted outright. Exact, www-stripped, or subdomain matches
/// skip the heuristic battery entirely.
const LEGITIMATE_DOMAINS: &[&str] = &[
    "google.com",
    "youtube.com",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "linkedin.com",
    "github.com",
    "stackoverflow.com",
    "reddit.com",
    "amazon.com",
    "microsoft.com",
    "apple.com",
    "netflix.com",
    "paypal.com",
    "ebay.com",
    "wikipedia.org",
    "mozilla.org",
];

/// TLDs disproportionately used for throwaway phishing domains.
const SUSPICIOUS_TLDS: &[&str] = &[
    "tk", "ml", "ga", "cf", "gq", "xyz", "top", "click", "link", "icu", "pw", "work", "racing",
    "loan", "download", "stream", "party", "review",
];

/// Checked in order; only the first hit is scored.
const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "login",
    "signin",
    "verify",
    "account",
    "secure",
    "update",
    "banking",
    "password",
    "confirm",
    "suspended",
    "locked",
    "urgent",
    "expire",
];

/// Known link shortening services, matched by substring.
const URL_SHORTENERS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "goo.gl",
    "t.co",
    "ow.ly",
    "is.gd",
    "buff.ly",
    "adf.ly",
    "bl.ink",
    "lnkd.in",
    "shorte.st",
    "mcaf.ee",
    "su.pr",
    "bc.vc",
    "youtu.be",
    "j.mp",
    "tr.im",
    "cli.gs",
    "tiny.cc",
    "url.ie",
];

/// Browser-internal schemes that are never scored.
const INTERNAL_SCHEMES: &[&str] = &[
    "about",
    "chrome",
    "chrome-extension",
    "moz-extension",
    "edge",
    "opera",
];

// ============================================
// ANALYSIS CONTEXT
// ============================================

/// Borrowed view of the user lists plus the bypass decision for this call.
/// The owning service resolves bypass state up front because the ledger is
/// keyed by exact URL while the analyzer itself only sees parsed parts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisContext<'a> {
    whitelist: Option<&'a HashSet<String>>,
    blacklist: Option<&'a HashSet<String>>,
    bypass_active: bool,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(whitelist: &'a HashSet<String>, blacklist: &'a HashSet<String>) -> Self {
        Self {
            whitelist: Some(whitelist),
            blacklist: Some(blacklist),
            bypass_active: false,
        }
    }

    pub fn bypass_active(mut self, active: bool) -> Self {
        self.bypass_active = active;
        self
    }

    fn is_whitelisted(&self, hostname: &str) -> bool {
        self.whitelist.map_or(false, |list| list.contains(hostname))
    }

    fn is_blacklisted(&self, hostname: &str) -> bool {
        self.blacklist.map_or(false, |list| list.contains(hostname))
    }
}

// ============================================
// RISK ANALYZER
// ============================================

#[derive(Debug, Clone)]
pub struct RiskAnalyzer {
    detector: TyposquatDetector,
}

impl Default for RiskAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskAnalyzer {
    pub fn new() -> Self {
        Self {
            detector: TyposquatDetector::new(),
        }
    }

    pub fn with_detector(detector: TyposquatDetector) -> Self {
        Self { detector }
    }

    /// Score one URL. Pure with respect to its inputs; reputation lookups
    /// and caching are the owning service's concern.
    ///
    /// A URL that fails to parse yields a zero-score report carrying the
    /// parse error, never a panic.
    pub fn analyze(
        &self,
        url: &str,
        page_signals: Option<&PageSignals>,
        ctx: AnalysisContext<'_>,
    ) -> RiskReport {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(url = url, error = %err, "URL failed to parse");
                let mut report = RiskReport::new("", "");
                report.error = Some(err.to_string());
                return report;
            }
        };

        let scheme = parsed.scheme();
        // Hosts of non-special schemes are not normalized by the parser
        let hostname = parsed.host_str().unwrap_or("").to_lowercase();
        let mut report = RiskReport::new(hostname.clone(), scheme);

        if INTERNAL_SCHEMES.contains(&scheme) {
            report.system_page = true;
            return report;
        }

        let is_http = scheme == "http";

        if is_legitimate(&hostname) {
            report.legitimate = true;
            if is_http {
                report.score = 10;
                report.signals.push(RiskSignal::new(
                    "Legitimate site using insecure HTTP",
                    10,
                    SignalCategory::Protocol,
                ));
            }
            return report;
        }

        if ctx.is_whitelisted(&hostname) {
            report.whitelisted = true;
            return report;
        }

        if ctx.is_blacklisted(&hostname) {
            report.blacklisted = true;
            report.score = 100;
            report.signals.push(RiskSignal::new(
                "Blocked by user",
                100,
                SignalCategory::UserList,
            ));
            return report;
        }

        if ctx.bypass_active {
            report.bypassed = true;
            return report;
        }

        let mut total: u32 = 0;
        let mut signals: Vec<RiskSignal> = Vec::new();

        // HTTP check
        if is_http {
            total += 15;
            signals.push(RiskSignal::new(
                "Insecure HTTP connection",
                15,
                SignalCategory::Protocol,
            ));
        }

        // IP address instead of domain
        if is_ip_literal(&hostname) {
            total += 40;
            signals.push(RiskSignal::new(
                "Direct IP address access",
                40,
                SignalCategory::Host,
            ));
        }

        // Typosquatting; weight is 60% of match confidence
        let typo_result = self.detector.detect(&hostname);
        let typo_confidence = typo_result.as_ref().map(|m| m.confidence).unwrap_or(0);
        if let Some(found) = typo_result {
            let weight = ((f64::from(found.confidence) * 0.6).round() as u32).min(95) as u8;
            total += u32::from(weight);
            signals.push(RiskSignal::with_detail(
                found.impersonation_reason(),
                weight,
                found.detail.clone(),
                SignalCategory::Typosquatting,
            ));
        }

        // Suspicious TLD
        if let Some(tld) = hostname.rsplit('.').next() {
            if SUSPICIOUS_TLDS.contains(&tld) {
                total += 25;
                signals.push(RiskSignal::new(
                    format!("Suspicious TLD (.{})", tld),
                    25,
                    SignalCategory::Tld,
                ));
            }
        }

        // IDN / non-ASCII host; parsed hosts arrive punycoded
        if is_idn_host(&hostname) {
            total += 30;
            signals.push(RiskSignal::new(
                "Non-ASCII characters in domain",
                30,
                SignalCategory::Host,
            ));
        }

        // Excessive subdomains
        let label_count = hostname.split('.').count();
        if label_count > 4 {
            total += 15;
            signals.push(RiskSignal::new(
                format!("Too many subdomains ({})", label_count),
                15,
                SignalCategory::Structure,
            ));
        }

        // Long domain name
        if hostname.len() > 40 {
            total += 10;
            signals.push(RiskSignal::new(
                "Very long domain name",
                10,
                SignalCategory::Structure,
            ));
        }

        // Excessive dashes
        let dash_count = hostname.matches('-').count();
        if dash_count > 2 {
            total += 10;
            signals.push(RiskSignal::new(
                format!("Too many dashes ({})", dash_count),
                10,
                SignalCategory::Structure,
            ));
        }

        // Underscores in domain
        if hostname.contains('_') {
            total += 10;
            signals.push(RiskSignal::new(
                "Domain contains underscores",
                10,
                SignalCategory::Structure,
            ));
        }

        // Many digits
        let digit_count = hostname.chars().filter(|c| c.is_ascii_digit()).count();
        if digit_count > 4 {
            total += 10;
            signals.push(RiskSignal::new(
                format!("Many digits in domain ({})", digit_count),
                10,
                SignalCategory::Structure,
            ));
        }

        // Suspicious keywords, skipped when typosquatting already flagged
        if typo_confidence < 70 {
            for keyword in SUSPICIOUS_KEYWORDS {
                if hostname.contains(keyword) {
                    total += 15;
                    signals.push(RiskSignal::new(
                        format!("Suspicious keyword: {}", keyword),
                        15,
                        SignalCategory::Keyword,
                    ));
                    break;
                }
            }
        }

        // Non-standard port; the registered range 1024-49151 is tolerated
        if let Some(port) = parsed.port() {
            if port != 80 && port != 443 && !(1024..=49151).contains(&port) {
                total += 15;
                signals.push(RiskSignal::new(
                    format!("Non-standard port ({})", port),
                    15,
                    SignalCategory::Port,
                ));
            }
        }

        // URL shortener
        for shortener in URL_SHORTENERS {
            if hostname.contains(shortener) {
                total += 20;
                signals.push(RiskSignal::with_detail(
                    "URL shortening service",
                    20,
                    *shortener,
                    SignalCategory::Shortener,
                ));
                break;
            }
        }

        // Page-level observations, when a collector supplied them
        if let Some(page) = page_signals {
            if page.external_form_count > 0 {
                total += 30;
                signals.push(RiskSignal::with_detail(
                    "Forms submit to external domain",
                    30,
                    format!("{} forms post to other domains", page.external_form_count),
                    SignalCategory::PageContent,
                ));
            }
            if page.has_password_field && is_http {
                total += 50;
                signals.push(RiskSignal::new(
                    "CRITICAL: Login form on HTTP",
                    50,
                    SignalCategory::PageContent,
                ));
            }
        }

        report.score = total.min(100) as u8;
        report.signals = signals;

        debug!(
            hostname = %report.hostname,
            score = report.score,
            signal_count = report.signals.len(),
            "analysis complete"
        );
        report
    }
}

fn is_legitimate(hostname: &str) -> bool {
    for domain in LEGITIMATE_DOMAINS {
        if hostname == *domain {
            return true;
        }
        if let Some(stripped) = hostname.strip_prefix("www.") {
            if stripped == *domain {
                return true;
            }
        }
        if hostname.ends_with(&format!(".{}", domain)) {
            return true;
        }
    }
    false
}
