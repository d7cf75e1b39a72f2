// Lifetime counters kept by the guard service

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    #[serde(default)]
    pub sites_scanned: u64,
    #[serde(default)]
    pub threats_blocked: u64,
    #[serde(default)]
    pub bypasses_used: u64,
}
