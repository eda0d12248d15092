//! One update check: environment, channel map fetch, resolution

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::config::{SnapEnvironment, SnapRevision, UpdaterConfig};
use crate::error::CheckError;
use crate::snap::graph::ChannelGraph;
use crate::snap::track::Track;
use crate::store::ChannelMapSource;
use crate::updater::advisor::UpgradeAdvisor;
use crate::updater::advisory::Advisory;

const REPLACEMENT_NOTICE: &str = "NOTE! Using a replacement 'updater' for the snap package. \
     Report any issues to the snap package maintainers, not to the upstream project.";

static ANNOUNCED: AtomicBool = AtomicBool::new(false);

/// Log the replacement-updater notice once per process.
///
/// Returns true if this call logged it.
pub fn announce_replacement() -> bool {
    if ANNOUNCED.swap(true, Ordering::SeqCst) {
        return false;
    }
    warn!("{}", REPLACEMENT_NOTICE);
    true
}

/// Check whether the running snap should switch channel
///
/// Fails when the environment is incomplete or the store cannot be read;
/// callers keep their previous advisory in that case.
pub async fn check_new_version(
    source: &dyn ChannelMapSource,
    environment: &SnapEnvironment,
    config: &UpdaterConfig,
) -> Result<Advisory, CheckError> {
    let info = source.fetch_snap_info(&environment.architecture).await?;
    let graph = ChannelGraph::from_channel_map(&info.channel_map);
    info!("Channel map: {}", graph);

    let advisor = UpgradeAdvisor::new(&graph, info.default_track.as_deref(), &config.snap_name);
    let revision = resolve_revision(&graph, &advisor, environment)?;

    Ok(advisor.resolve(revision, &environment.current_version))
}

/// Map the environment's revision to a store revision.
///
/// Locally built snaps (`x1`, ...) are assumed to track the newest channel of
/// their version line, or of the default track when that line is unknown.
fn resolve_revision(
    graph: &ChannelGraph,
    advisor: &UpgradeAdvisor<'_>,
    environment: &SnapEnvironment,
) -> Result<u64, CheckError> {
    let local = match &environment.revision {
        SnapRevision::Store(revision) => return Ok(*revision),
        SnapRevision::Local(local) => local,
    };

    let line_channel = environment
        .current_version
        .major_minor()
        .and_then(|line| graph.track(&line).and_then(Track::latest));

    let revision = line_channel
        .or_else(|| advisor.default_channel())
        .map(|channel| channel.revision())
        .ok_or_else(|| CheckError::UnresolvedLocalRevision(local.clone()))?;

    warn!("Locally built ({}), using SNAP_REVISION: {}", local, revision);
    Ok(revision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::snap::metadata::{ChannelMapEntry, SnapInfo};
    use crate::snap::version::Version;
    use crate::store::MockChannelMapSource;
    use mockall::predicate::eq;

    fn environment(revision: SnapRevision, version: &str) -> SnapEnvironment {
        SnapEnvironment {
            revision,
            architecture: "arm64".to_string(),
            current_version: Version::parse(version),
        }
    }

    fn snap_info() -> SnapInfo {
        SnapInfo {
            channel_map: vec![
                ChannelMapEntry::new("2023.9", "stable", 400, "2023.9.3"),
                ChannelMapEntry::new("2023.10", "stable", 412, "2023.10.1"),
                ChannelMapEntry::new("2023.10", "edge", 420, "2023.10.2"),
            ],
            default_track: Some("2023.10".to_string()),
        }
    }

    fn source_returning(info: SnapInfo) -> MockChannelMapSource {
        let mut source = MockChannelMapSource::new();
        source
            .expect_fetch_snap_info()
            .with(eq("arm64"))
            .times(1)
            .returning(move |_| Ok(info.clone()));
        source
    }

    #[tokio::test]
    async fn check_new_version_resolves_store_revision() {
        let source = source_returning(snap_info());
        let env = environment(SnapRevision::Store(400), "2023.9.3");

        let advisory = check_new_version(&source, &env, &UpdaterConfig::default())
            .await
            .unwrap();

        assert!(advisory.update_available);
        assert_eq!(advisory.newest_version.as_deref(), Some("2023.10.1"));
        assert!(advisory.update_notes.contains("--channel=2023.10/stable"));
    }

    #[tokio::test]
    async fn check_new_version_maps_local_revision_to_version_line() {
        let source = source_returning(snap_info());
        let env = environment(SnapRevision::Local("x1".to_string()), "2023.9.1");

        let advisory = check_new_version(&source, &env, &UpdaterConfig::default())
            .await
            .unwrap();

        // x1 is treated as 2023.9/stable (400), so 2023.10/stable is suggested
        assert!(advisory.update_available);
        assert!(
            advisory
                .update_notes
                .starts_with("You're currently on _«2023.9.3, revision: 400")
        );
    }

    #[tokio::test]
    async fn check_new_version_maps_local_revision_to_default_track() {
        let source = source_returning(snap_info());
        let env = environment(SnapRevision::Local("x2".to_string()), "2024.1.0");

        let advisory = check_new_version(&source, &env, &UpdaterConfig::default())
            .await
            .unwrap();

        assert!(!advisory.update_available);
        assert_eq!(
            advisory.update_notes,
            "You're on _«2023.10.1, revision: 412, channel: 2023.10/stable»_!"
        );
    }

    #[tokio::test]
    async fn check_new_version_fails_for_unmappable_local_revision() {
        let info = SnapInfo {
            channel_map: vec![],
            default_track: None,
        };
        let source = source_returning(info);
        let env = environment(SnapRevision::Local("x1".to_string()), "2023.9.1");

        let result = check_new_version(&source, &env, &UpdaterConfig::default()).await;

        assert!(matches!(
            result,
            Err(CheckError::UnresolvedLocalRevision(local)) if local == "x1"
        ));
    }

    #[tokio::test]
    async fn check_new_version_propagates_store_errors() {
        let mut source = MockChannelMapSource::new();
        source
            .expect_fetch_snap_info()
            .returning(|_| Err(StoreError::Timeout));
        let env = environment(SnapRevision::Store(400), "2023.9.3");

        let result = check_new_version(&source, &env, &UpdaterConfig::default()).await;

        assert!(matches!(result, Err(CheckError::Store(StoreError::Timeout))));
    }

    #[tokio::test]
    async fn check_new_version_uses_configured_snap_name_in_notes() {
        let source = source_returning(snap_info());
        let env = environment(SnapRevision::Store(400), "2023.9.3");
        let config = UpdaterConfig {
            snap_name: "my-snap".to_string(),
            ..UpdaterConfig::default()
        };

        let advisory = check_new_version(&source, &env, &config).await.unwrap();

        assert!(advisory.update_notes.contains("`sudo snap switch my-snap --channel="));
    }

    #[test]
    fn announce_replacement_logs_only_once() {
        announce_replacement();

        assert!(!announce_replacement());
        assert!(!announce_replacement());
    }
}
