//! Snap Store (api.snapcraft.io) channel map source

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{DEFAULT_SNAP_NAME, DEFAULT_STORE_URL, FETCH_TIMEOUT_MS};
use crate::error::StoreError;
use crate::snap::metadata::SnapInfo;
use crate::store::ChannelMapSource;

/// Store fields requested with every info call
const INFO_FIELDS: &str = "channel-map,revision,version";

/// Device series header value required by the info endpoint
const DEVICE_SERIES: &str = "16";

/// Channel map source backed by the Snap Store info API
pub struct SnapcraftStore {
    client: reqwest::Client,
    base_url: String,
    snap_name: String,
}

impl SnapcraftStore {
    /// Creates a new SnapcraftStore with a custom base URL
    pub fn new(base_url: &str, snap_name: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("snap-updater")
                .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            snap_name: snap_name.to_string(),
        }
    }

    fn info_url(&self, architecture: &str) -> String {
        format!(
            "{}/v2/snaps/info/{}?architecture={}&fields={}",
            self.base_url, self.snap_name, architecture, INFO_FIELDS
        )
    }
}

impl Default for SnapcraftStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_URL, DEFAULT_SNAP_NAME)
    }
}

#[async_trait::async_trait]
impl ChannelMapSource for SnapcraftStore {
    async fn fetch_snap_info(&self, architecture: &str) -> Result<SnapInfo, StoreError> {
        let url = self.info_url(architecture);
        debug!("Fetching channel map from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Snap-Device-Series", DEVICE_SERIES)
            .send()
            .await
            .map_err(StoreError::from_transport)?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(self.snap_name.clone()));
        }

        if !status.is_success() {
            warn!("Snap store returned status {}: {}", status, url);
            return Err(StoreError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(StoreError::from_transport)?;

        // Non-JSON bodies and schema violations are reported separately
        let value: Value = serde_json::from_slice(&body).map_err(|e| {
            warn!("Received invalid JSON from the snap store: {}", e);
            StoreError::InvalidJson(e)
        })?;

        serde_json::from_value(value).map_err(|e| {
            warn!("Unexpected snap store response: {}", e);
            StoreError::Schema(e)
        })
    }
}
