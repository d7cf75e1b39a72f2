// Services module for PhishGuard Core
// Detection and orchestration layer for the engine

pub mod analyzer;
pub mod background_tasks;
pub mod bypass;
pub mod cache;
pub mod guard;
pub mod reputation;
pub mod typosquat;

// Re-export commonly used services
pub use analyzer::{AnalysisContext, RiskAnalyzer};
pub use background_tasks::{spawn_sweeper, SweeperHandle};
pub use bypass::BypassLedger;
pub use cache::AnalysisCache;
pub use guard::GuardService;
pub use reputation::{ReputationProvider, ReputationVerdict, StaticReputationProvider};
pub use typosquat::{BrandCatalog, TyposquatDetector};
