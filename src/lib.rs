// Library exports for PhishGuard Core
// This file exposes modules and functions for library consumers

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::{ConfigError, GuardConfig};
pub use models::{
    GuardCommand, GuardReply, GuardSnapshot, MatchMethod, PageSignals, RiskReport, RiskSignal,
    ScanStats, SignalCategory, SnapshotError, ThreatLevel, TyposquatMatch,
};
pub use services::{
    spawn_sweeper, AnalysisCache, AnalysisContext, BrandCatalog, BypassLedger, GuardService,
    ReputationProvider, ReputationVerdict, RiskAnalyzer, StaticReputationProvider, SweeperHandle,
    TyposquatDetector,
};

// Library initialization function for external consumers
// Builds a service from environment configuration and starts its sweeper.
// Must be called from within a Tokio runtime.
pub fn initialize_guard() -> Result<(GuardService, SweeperHandle), ConfigError> {
    let config = GuardConfig::from_env()?;
    let service = GuardService::with_config(config);
    let sweeper = spawn_sweeper(service.clone());
    Ok((service, sweeper))
}
