// Background maintenance for guard state
// Periodically expires cached reports and bypass grants

use tokio::task::JoinHandle;
use tracing::info;

use crate::services::guard::GuardService;

/// Handle to a running sweeper task. Dropping the handle detaches the
/// task; call [`SweeperHandle::stop`] to shut it down.
pub struct SweeperHandle {
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

/// Spawn a task that sweeps the service on its configured interval.
///
/// Expiry is also enforced lazily on access, so the sweeper only bounds
/// how long dead entries occupy memory.
pub fn spawn_sweeper(service: GuardService) -> SweeperHandle {
    let sweep_interval = service.config().sweep_interval;
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);

        // Skip the immediate first tick; there is nothing to expire yet
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let (expired_reports, expired_bypasses) = service.sweep().await;
            if expired_reports > 0 || expired_bypasses > 0 {
                info!(
                    expired_reports = expired_reports,
                    expired_bypasses = expired_bypasses,
                    "background sweep"
                );
            }
        }
    });
    SweeperHandle { handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuardConfig;
    use std::time::Duration;

    #[tokio::test]
    async fn test_sweeper_expires_state() {
        let config = GuardConfig::new()
            .with_cache_ttl(Duration::from_millis(20))
            .with_bypass_duration(Duration::from_millis(20))
            .with_sweep_interval(Duration::from_millis(25));
        let service = GuardService::with_config(config);

        service
            .analyze_url("https://sweep-me-away.com/", None, false)
            .await;
        service.grant_bypass("https://sweep-me-away.com/").await;
        assert_eq!(service.cache_size().await, 1);
        assert_eq!(service.bypass_count().await, 1);

        let sweeper = spawn_sweeper(service.clone());
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(service.cache_size().await, 0, "cached report should expire");
        assert_eq!(service.bypass_count().await, 0, "bypass should expire");

        sweeper.stop();
    }

    #[tokio::test]
    async fn test_stop_aborts_the_task() {
        let sweeper = spawn_sweeper(GuardService::new());
        assert!(sweeper.is_running());

        sweeper.stop();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!sweeper.is_running());
    }
}
