// Durable state snapshot: user lists and counters, never caches or bypasses

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::stats::ScanStats;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Everything worth persisting across restarts. Cached reports and temporary
/// bypasses are excluded on purpose; both expire on their own clocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardSnapshot {
    pub whitelist: Vec<String>,
    pub blacklist: Vec<String>,
    pub stats: ScanStats,
}

impl GuardSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(payload: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let snapshot = GuardSnapshot {
            whitelist: vec!["mybank.com".to_string()],
            blacklist: vec!["evil.tk".to_string(), "worse.ml".to_string()],
            stats: ScanStats {
                sites_scanned: 42,
                threats_blocked: 3,
                bypasses_used: 1,
            },
        };
        let json = snapshot.to_json().unwrap();
        let restored = GuardSnapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_empty_payload_yields_defaults() {
        let restored = GuardSnapshot::from_json("{}").unwrap();
        assert_eq!(restored, GuardSnapshot::default());
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(GuardSnapshot::from_json("not json").is_err());
        assert!(GuardSnapshot::from_json(r#"{"whitelist": 5}"#).is_err());
    }
}
