pub mod command;
pub mod page_signals;
pub mod report;
pub mod snapshot;
pub mod stats;
pub mod typosquat;

// Re-export common types
pub use command::{GuardCommand, GuardReply};
pub use page_signals::PageSignals;
pub use report::{RiskReport, RiskSignal, SignalCategory, ThreatLevel};
pub use snapshot::{GuardSnapshot, SnapshotError};
pub use stats::ScanStats;
pub use typosquat::{MatchMethod, TyposquatMatch};
