//! A named group of channels sharing a track label

use std::fmt;

use crate::snap::channel::Channel;
use crate::snap::metadata::ChannelMapEntry;
use crate::snap::version::Version;

/// Channels of one track, kept sorted ascending by risk rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    name: Version,
    channels: Vec<Channel>,
}

impl Track {
    pub fn new(name: &str) -> Self {
        Self {
            name: Version::parse(name),
            channels: Vec::new(),
        }
    }

    pub fn name(&self) -> &Version {
        &self.name
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Append a channel built from `entry` and restore risk order.
    ///
    /// The sort is stable, so channels of equal risk keep insertion order.
    /// Duplicates are not filtered.
    pub(crate) fn add_channel(&mut self, entry: &ChannelMapEntry) -> &mut Self {
        self.channels.push(Channel::new(self.name.clone(), entry));
        self.channels.sort_by_key(|channel| channel.risk().rank());
        self
    }

    /// First channel with exactly `revision`
    pub fn channel_with_revision(&self, revision: u64) -> Option<&Channel> {
        self.channels
            .iter()
            .find(|channel| channel.revision() == revision)
    }

    /// The channel that beats every other one by [`Channel::is_newer_than`],
    /// starting from `floor`.
    ///
    /// Returns `floor` itself when nothing in the track is newer, so callers
    /// must check the result with `is_newer_than(floor)` before treating it
    /// as an upgrade.
    pub fn channel_with_higher_revision<'a>(&'a self, floor: &'a Channel) -> &'a Channel {
        self.channels.iter().fold(floor, |newest, channel| {
            if channel.is_newer_than(newest) {
                channel
            } else {
                newest
            }
        })
    }

    /// Channel with the highest risk rank
    pub fn latest(&self) -> Option<&Channel> {
        self.channels.last()
    }

    /// Long form listing every channel: `0.118(beta/110, stable/100)`
    pub fn describe(&self) -> String {
        let risks: Vec<String> = self
            .channels
            .iter()
            .map(|channel| format!("{}/{}", channel.risk_name(), channel.revision()))
            .collect();
        format!("{}({})", self.name, risks.join(", "))
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
