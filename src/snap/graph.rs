//! Cross-track queries over the whole channel map

use std::fmt;

use tracing::debug;

use crate::snap::channel::Channel;
use crate::snap::metadata::ChannelMapEntry;
use crate::snap::risk::Risk;
use crate::snap::track::Track;

/// Every track of a snap, sorted ascending by track name
///
/// Built once from the store's channel map and immutable afterward.
/// Revisions are not required to be unique: the same revision is usually
/// released to several risks and to the `latest` track at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelGraph {
    tracks: Vec<Track>,
}

impl ChannelGraph {
    /// Group channel-map entries into tracks
    pub fn from_channel_map(channel_map: &[ChannelMapEntry]) -> Self {
        let mut tracks: Vec<Track> = Vec::new();

        for entry in channel_map {
            let name = entry.channel.track.as_str();
            match tracks.iter_mut().find(|track| track.name() == name) {
                Some(track) => {
                    track.add_channel(entry);
                }
                None => {
                    let mut track = Track::new(name);
                    track.add_channel(entry);
                    tracks.push(track);
                }
            }
        }

        tracks.sort_by(|a, b| a.name().cmp(b.name()));

        debug!(
            "Built channel graph with {} tracks from {} channels",
            tracks.len(),
            channel_map.len()
        );

        Self { tracks }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.tracks.iter().flat_map(|track| track.channels())
    }

    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|track| track.name() == name)
    }

    /// The last track (by name) whose top channel is on the `latest` risk.
    ///
    /// Other unranked risks sort the same way but never mark a track as
    /// the rolling default.
    pub fn latest(&self) -> Option<&Track> {
        self.tracks.iter().rev().find(|track| {
            track
                .latest()
                .is_some_and(|channel| channel.risk_name() == Risk::Latest.as_str())
        })
    }

    /// First channel with `revision`, scanning tracks in name order.
    ///
    /// When a revision is released to several tracks this is the one in the
    /// lowest-sorting track, which is rarely `latest`.
    pub fn find_for_revision(&self, revision: u64) -> Option<&Channel> {
        self.tracks
            .iter()
            .find_map(|track| track.channel_with_revision(revision))
    }

    /// First channel, in track then risk order, that is newer than `floor`.
    ///
    /// This is first-found rather than best-found: with tracks sorted
    /// ascending it tends to suggest the nearest newer track.
    pub fn channel_with_higher_revision(&self, floor: &Channel) -> Option<&Channel> {
        self.channels().find(|channel| channel.is_newer_than(floor))
    }

    /// The channel with the highest revision strictly below `revision`.
    ///
    /// Ties keep the first channel found.
    pub fn track_with_lower_revision(&self, revision: u64) -> Option<&Channel> {
        self.channels()
            .filter(|channel| channel.revision() < revision)
            .fold(None, |closest: Option<&Channel>, channel| match closest {
                Some(closest) if closest.revision() >= channel.revision() => Some(closest),
                _ => Some(channel),
            })
    }
}

impl fmt::Display for ChannelGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tracks: Vec<String> = self.tracks.iter().map(Track::describe).collect();
        f.write_str(&tracks.join(", "))
    }
}
