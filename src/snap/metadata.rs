//! Snap Store response model
//!
//! Only the fields the updater needs are modelled; everything else in the
//! store response is ignored.

use serde::Deserialize;

/// Response of `GET /v2/snaps/info/{snap}`
///
/// Both keys are required. `default-track` may be `null` for snaps without a
/// default track.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SnapInfo {
    #[serde(rename = "channel-map")]
    pub channel_map: Vec<ChannelMapEntry>,
    #[serde(rename = "default-track", deserialize_with = "Option::deserialize")]
    pub default_track: Option<String>,
}

/// One released revision in one channel
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChannelMapEntry {
    pub channel: ChannelDescriptor,
    pub revision: u64,
    pub version: String,
}

/// The channel part of a channel-map entry
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChannelDescriptor {
    pub track: String,
    pub risk: String,
    pub architecture: String,
    /// Full channel name, e.g. "2023.10/stable"
    #[serde(default)]
    pub name: Option<String>,
}

impl ChannelMapEntry {
    /// Build an entry for `amd64`; see [`ChannelMapEntry::with_architecture`]
    pub fn new(track: &str, risk: &str, revision: u64, version: &str) -> Self {
        Self {
            channel: ChannelDescriptor {
                track: track.to_string(),
                risk: risk.to_string(),
                architecture: "amd64".to_string(),
                name: Some(format!("{}/{}", track, risk)),
            },
            revision,
            version: version.to_string(),
        }
    }

    pub fn with_architecture(mut self, architecture: &str) -> Self {
        self.channel.architecture = architecture.to_string();
        self
    }
}
