//! Periodic update checks with a last-known advisory

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::config::{SnapEnvironment, UpdaterConfig};
use crate::store::ChannelMapSource;
use crate::updater::advisory::Advisory;
use crate::updater::check::{announce_replacement, check_new_version};

/// Advisory of the last successful check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub advisory: Advisory,
    pub checked_at: DateTime<Utc>,
}

/// Runs update checks one at a time and keeps the last good result
pub struct UpdateCoordinator {
    source: Arc<dyn ChannelMapSource>,
    environment: SnapEnvironment,
    config: UpdaterConfig,
    snapshot: RwLock<Option<Snapshot>>,
}

impl UpdateCoordinator {
    pub fn new(
        source: Arc<dyn ChannelMapSource>,
        environment: SnapEnvironment,
        config: UpdaterConfig,
    ) -> Self {
        announce_replacement();
        Self {
            source,
            environment,
            config,
            snapshot: RwLock::new(None),
        }
    }

    /// Last known advisory, if any check has succeeded
    pub async fn advisory(&self) -> Option<Advisory> {
        self.snapshot
            .read()
            .await
            .as_ref()
            .map(|snapshot| snapshot.advisory.clone())
    }

    /// Time of the last successful check
    pub async fn last_success(&self) -> Option<DateTime<Utc>> {
        self.snapshot
            .read()
            .await
            .as_ref()
            .map(|snapshot| snapshot.checked_at)
    }

    /// Run one check.
    ///
    /// On success the stored advisory is replaced as a whole; on failure the
    /// error is logged and the previous advisory is kept. Returns true if the
    /// check succeeded.
    pub async fn refresh(&self) -> bool {
        match check_new_version(self.source.as_ref(), &self.environment, &self.config).await {
            Ok(advisory) => {
                info!(
                    "Update check finished: update_available={}, newest_version={}",
                    advisory.update_available,
                    advisory.newest_version.as_deref().unwrap_or("unknown")
                );
                *self.snapshot.write().await = Some(Snapshot {
                    advisory,
                    checked_at: Utc::now(),
                });
                true
            }
            Err(e) => {
                error!("Update check failed: {}", e);
                false
            }
        }
    }

    /// Check now and then every `check_interval`, forever.
    ///
    /// A check that overruns the interval delays the next one instead of
    /// piling up, so at most one check is in flight.
    pub async fn run(&self) {
        let mut ticker = interval(self.config.check_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.refresh().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnapRevision;
    use crate::error::StoreError;
    use crate::snap::metadata::{ChannelMapEntry, SnapInfo};
    use crate::snap::version::Version;
    use crate::store::MockChannelMapSource;
    use mockall::Sequence;

    fn environment() -> SnapEnvironment {
        SnapEnvironment {
            revision: SnapRevision::Store(400),
            architecture: "amd64".to_string(),
            current_version: Version::parse("2023.9.3"),
        }
    }

    fn snap_info() -> SnapInfo {
        SnapInfo {
            channel_map: vec![
                ChannelMapEntry::new("2023.9", "stable", 400, "2023.9.3"),
                ChannelMapEntry::new("2023.10", "stable", 412, "2023.10.1"),
            ],
            default_track: Some("2023.10".to_string()),
        }
    }

    #[tokio::test]
    async fn advisory_is_none_before_first_check() {
        let coordinator = UpdateCoordinator::new(
            Arc::new(MockChannelMapSource::new()),
            environment(),
            UpdaterConfig::default(),
        );

        assert_eq!(coordinator.advisory().await, None);
        assert_eq!(coordinator.last_success().await, None);
    }

    #[tokio::test]
    async fn refresh_stores_advisory_on_success() {
        let mut source = MockChannelMapSource::new();
        source
            .expect_fetch_snap_info()
            .times(1)
            .returning(|_| Ok(snap_info()));
        let coordinator =
            UpdateCoordinator::new(Arc::new(source), environment(), UpdaterConfig::default());

        assert!(coordinator.refresh().await);

        let advisory = coordinator.advisory().await.unwrap();
        assert!(advisory.update_available);
        assert_eq!(advisory.newest_version.as_deref(), Some("2023.10.1"));
        assert!(coordinator.last_success().await.is_some());
    }

    #[tokio::test]
    async fn refresh_keeps_previous_advisory_on_failure() {
        let mut seq = Sequence::new();
        let mut source = MockChannelMapSource::new();
        source
            .expect_fetch_snap_info()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(snap_info()));
        source
            .expect_fetch_snap_info()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(StoreError::InvalidResponse("Unexpected status: 500".to_string())));
        let coordinator =
            UpdateCoordinator::new(Arc::new(source), environment(), UpdaterConfig::default());

        assert!(coordinator.refresh().await);
        let before = coordinator.advisory().await;
        let checked_at = coordinator.last_success().await;

        assert!(!coordinator.refresh().await);

        assert_eq!(coordinator.advisory().await, before);
        assert_eq!(coordinator.last_success().await, checked_at);
    }

    #[tokio::test(start_paused = true)]
    async fn run_checks_immediately_and_then_every_interval() {
        let mut source = MockChannelMapSource::new();
        source
            .expect_fetch_snap_info()
            .times(2)
            .returning(|_| Ok(snap_info()));
        let config = UpdaterConfig {
            check_interval: 45_000,
            ..UpdaterConfig::default()
        };
        let coordinator = UpdateCoordinator::new(Arc::new(source), environment(), config);

        // First tick fires at once, second after 45s; stop before the third
        let result = tokio::time::timeout(
            std::time::Duration::from_secs(60),
            coordinator.run(),
        )
        .await;

        assert!(result.is_err());
        assert!(coordinator.advisory().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn run_with_zero_interval_keeps_checking() {
        let mut source = MockChannelMapSource::new();
        source
            .expect_fetch_snap_info()
            .returning(|_| Ok(snap_info()));
        let config = serde_json::from_str::<UpdaterConfig>(r#"{"checkInterval": 0}"#).unwrap();
        let coordinator = UpdateCoordinator::new(Arc::new(source), environment(), config);

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(5),
            coordinator.run(),
        )
        .await;

        assert!(result.is_err());
        assert!(coordinator.advisory().await.is_some());
    }
}
