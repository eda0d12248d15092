//! Channel map test utilities

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use snap_updater::config::{SnapEnvironment, SnapRevision};
use snap_updater::error::StoreError;
use snap_updater::snap::metadata::SnapInfo;
use snap_updater::snap::version::Version;
use snap_updater::store::ChannelMapSource;

/// Store response shared by the integration tests
pub const CHANNEL_MAP_JSON: &str = include_str!("../fixtures/channel_map.json");

pub fn channel_map_fixture() -> SnapInfo {
    serde_json::from_str(CHANNEL_MAP_JSON).unwrap()
}

/// Mock channel map source serving canned responses in order.
/// The last response is repeated once the list is exhausted.
pub struct MockStore {
    responses: Vec<Result<SnapInfo, String>>,
    calls: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_info(mut self, info: SnapInfo) -> Self {
        self.responses.push(Ok(info));
        self
    }

    pub fn with_failure(mut self, message: &str) -> Self {
        self.responses.push(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelMapSource for MockStore {
    async fn fetch_snap_info(&self, _architecture: &str) -> Result<SnapInfo, StoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let index = call.min(self.responses.len().saturating_sub(1));
        match self.responses.get(index) {
            Some(Ok(info)) => Ok(info.clone()),
            Some(Err(message)) => Err(StoreError::InvalidResponse(message.clone())),
            None => Err(StoreError::NotFound("home-assistant-snap".to_string())),
        }
    }
}

/// Environment of a snap running `revision` of `version` on amd64
pub fn create_test_environment(revision: SnapRevision, version: &str) -> SnapEnvironment {
    SnapEnvironment {
        revision,
        architecture: "amd64".to_string(),
        current_version: Version::parse(version),
    }
}
