// Command envelope for driving the guard service over a message channel
// The `action` tag mirrors the field name used by extension-style callers

use serde::{Deserialize, Serialize};

use super::page_signals::PageSignals;
use super::report::RiskReport;
use super::stats::ScanStats;

/// One request addressed to the guard service. Unknown actions fail to
/// deserialize; callers surface that as a protocol error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum GuardCommand {
    #[serde(rename_all = "camelCase")]
    AnalyzeUrl {
        url: String,
        #[serde(default)]
        page_signals: Option<PageSignals>,
        #[serde(default)]
        force_analysis: bool,
    },
    SetTemporaryBypass {
        url: String,
    },
    AddToWhitelist {
        domain: String,
    },
    AddToBlacklist {
        domain: String,
    },
    GetStats,
}

/// Reply for a dispatched command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GuardReply {
    Report(RiskReport),
    Stats(ScanStats),
    Acknowledged,
}
