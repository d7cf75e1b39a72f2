// Configuration modules for PhishGuard Core

pub mod analysis;

pub use analysis::{ConfigError, GuardConfig};
