//! Channel map sources
//!
//! - [`snapcraft`]: Snap Store HTTP API implementation

pub mod snapcraft;

#[cfg(test)]
use mockall::automock;

use crate::error::StoreError;
use crate::snap::metadata::SnapInfo;

pub use snapcraft::SnapcraftStore;

/// Trait for fetching a snap's channel map
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ChannelMapSource: Send + Sync {
    /// Fetches the channel map and default track for one architecture
    ///
    /// # Arguments
    /// * `architecture` - Snap architecture of the running system (e.g., "amd64")
    ///
    /// # Returns
    /// * `Ok(SnapInfo)` - Channel map as published by the store
    /// * `Err(StoreError)` - If the fetch fails or the response is malformed
    async fn fetch_snap_info(&self, architecture: &str) -> Result<SnapInfo, StoreError>;
}
