// Runtime tunables for the analysis pipeline
// Load once at startup; every knob has a default so the library works
// out of the box with no environment at all

use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_MAX_ENTRIES: usize = 200;
const DEFAULT_BYPASS_DURATION_SECS: u64 = 300;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
const DEFAULT_BLOCK_THRESHOLD: u8 = 50;
const DEFAULT_REPUTATION_TIMEOUT_SECS: u64 = 3;

/// Tunables for one guard instance. Treated as immutable after construction.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// How long a cached report stays valid.
    pub cache_ttl: Duration,
    /// Hard cap on cached reports; oldest entries are evicted first.
    pub cache_max_entries: usize,
    /// Lifetime of a user-granted bypass.
    pub bypass_duration: Duration,
    /// How often the background sweeper runs.
    pub sweep_interval: Duration,
    /// Scores at or above this block the page.
    pub block_threshold: u8,
    /// Budget for one reputation lookup before the result is discarded.
    pub reputation_timeout: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            bypass_duration: Duration::from_secs(DEFAULT_BYPASS_DURATION_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            block_threshold: DEFAULT_BLOCK_THRESHOLD,
            reputation_timeout: Duration::from_secs(DEFAULT_REPUTATION_TIMEOUT_SECS),
        }
    }
}

impl GuardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        debug_assert!(!ttl.is_zero(), "cache TTL must be non-zero");
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_capacity(mut self, max_entries: usize) -> Self {
        debug_assert!(max_entries > 0, "cache capacity must be non-zero");
        self.cache_max_entries = max_entries;
        self
    }

    pub fn with_bypass_duration(mut self, duration: Duration) -> Self {
        debug_assert!(!duration.is_zero(), "bypass duration must be non-zero");
        self.bypass_duration = duration;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        debug_assert!(!interval.is_zero(), "sweep interval must be non-zero");
        self.sweep_interval = interval;
        self
    }

    pub fn with_block_threshold(mut self, threshold: u8) -> Self {
        self.block_threshold = threshold;
        self
    }

    pub fn with_reputation_timeout(mut self, timeout: Duration) -> Self {
        self.reputation_timeout = timeout;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Helper function to get optional env var with default
        let get_or_default = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        // Helper function to parse env var with default
        let parse_u64_or_default = |key: &str, default: u64| -> Result<u64, ConfigError> {
            get_or_default(key, &default.to_string()).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        let cache_ttl_secs =
            parse_u64_or_default("PHISHGUARD_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;
        let cache_max_entries: usize =
            get_or_default("PHISHGUARD_CACHE_MAX_ENTRIES", "200")
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue(
                        "PHISHGUARD_CACHE_MAX_ENTRIES".to_string(),
                        "not a valid usize".to_string(),
                    )
                })?;
        let bypass_duration_secs = parse_u64_or_default(
            "PHISHGUARD_BYPASS_DURATION_SECS",
            DEFAULT_BYPASS_DURATION_SECS,
        )?;
        let sweep_interval_secs = parse_u64_or_default(
            "PHISHGUARD_SWEEP_INTERVAL_SECS",
            DEFAULT_SWEEP_INTERVAL_SECS,
        )?;
        let block_threshold: u8 = get_or_default("PHISHGUARD_BLOCK_THRESHOLD", "50")
            .parse()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "PHISHGUARD_BLOCK_THRESHOLD".to_string(),
                    "not a valid u8".to_string(),
                )
            })?;
        let reputation_timeout_secs = parse_u64_or_default(
            "PHISHGUARD_REPUTATION_TIMEOUT_SECS",
            DEFAULT_REPUTATION_TIMEOUT_SECS,
        )?;

        debug_assert!(cache_ttl_secs > 0, "cache TTL must be non-zero");
        debug_assert!(bypass_duration_secs > 0, "bypass duration must be non-zero");
        debug_assert!(sweep_interval_secs > 0, "sweep interval must be non-zero");

        Ok(Self {
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_max_entries,
            bypass_duration: Duration::from_secs(bypass_duration_secs),
            sweep_interval: Duration::from_secs(sweep_interval_secs),
            block_threshold,
            reputation_timeout: Duration::from_secs(reputation_timeout_secs),
        })
    }
}
