//! A single release point in the channel map

use std::fmt;

use crate::snap::metadata::ChannelMapEntry;
use crate::snap::risk::Risk;
use crate::snap::version::Version;

/// One `(track, risk)` channel pointing at a specific revision and version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Name of the owning track
    track: Version,
    architecture: String,
    risk: Risk,
    /// Risk as named by the store, kept for unknown risks ranked as unranked
    risk_name: String,
    revision: u64,
    version: Version,
}

impl Channel {
    /// Build a channel of `track` from a channel-map entry
    pub fn new(track: Version, entry: &ChannelMapEntry) -> Self {
        Self {
            track,
            architecture: entry.channel.architecture.clone(),
            risk: Risk::from_store(&entry.channel.risk),
            risk_name: entry.channel.risk.clone(),
            revision: entry.revision,
            version: Version::parse(&entry.version),
        }
    }

    pub fn track(&self) -> &Version {
        &self.track
    }

    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    pub fn risk(&self) -> Risk {
        self.risk
    }

    /// Risk name as published, e.g. `stable` or an unranked `nightly`
    pub fn risk_name(&self) -> &str {
        &self.risk_name
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn is_on_latest_track(&self) -> bool {
        self.track.is_latest()
    }

    /// Whether this channel is a strict upgrade over `other`.
    ///
    /// True iff neither channel lives on the `latest` track, this revision is
    /// higher and this risk is at least as stable. This is a partial order:
    /// channels on `latest`, or a higher revision at a riskier tier, compare
    /// as "not newer" in both directions.
    pub fn is_newer_than(&self, other: &Channel) -> bool {
        if self.is_on_latest_track() || other.is_on_latest_track() {
            return false;
        }

        self.revision > other.revision && self.risk >= other.risk
    }

    /// Long form used in update notes:
    /// `2023.10.1, revision: 412, channel: 2023.10/stable`
    pub fn describe(&self) -> String {
        format!(
            "{}, revision: {}, channel: {}",
            self.version, self.revision, self
        )
    }
}

/// Channel name as accepted by `snap switch --channel=`, e.g. `2023.10/stable`
impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.track, self.risk_name)
    }
}
