//! Upgrade resolution over the channel graph
//!
//! A revision can be released to several channels at once, and is always on
//! `latest`, so the channel found for the running revision is a best guess.
//! Someone on `latest` may therefore be told about releases in another track
//! that carry the same revision.

use tracing::{debug, warn};

use crate::snap::channel::Channel;
use crate::snap::graph::ChannelGraph;
use crate::snap::track::Track;
use crate::snap::version::Version;
use crate::updater::advisory::Advisory;

/// Resolves an [`Advisory`] for a running revision
pub struct UpgradeAdvisor<'a> {
    graph: &'a ChannelGraph,
    default_track: Option<&'a Track>,
    snap_name: &'a str,
}

impl<'a> UpgradeAdvisor<'a> {
    /// `default_track` is the store's default track name. When it is absent
    /// or unknown to the graph, [`ChannelGraph::latest`] is used instead.
    pub fn new(
        graph: &'a ChannelGraph,
        default_track: Option<&str>,
        snap_name: &'a str,
    ) -> Self {
        let default_track = default_track
            .and_then(|name| {
                let track = graph.track(name);
                if track.is_none() {
                    warn!("Default track {:?} not found in channel map", name);
                }
                track
            })
            .or_else(|| graph.latest());

        Self {
            graph,
            default_track,
            snap_name,
        }
    }

    pub fn default_track(&self) -> Option<&'a Track> {
        self.default_track
    }

    /// Top channel of the default track
    pub fn default_channel(&self) -> Option<&'a Channel> {
        self.default_track.and_then(Track::latest)
    }

    /// Decide whether `current_revision` should move to another channel.
    ///
    /// Never fails: sparse or unmatched data produces a conservative advisory.
    pub fn resolve(&self, current_revision: u64, current_version: &Version) -> Advisory {
        match self.graph.find_for_revision(current_revision) {
            Some(current) if current.is_on_latest_track() => self.leave_latest_track(current),
            Some(current) => self.resolve_known(current),
            None => self.resolve_unknown(current_revision, current_version),
        }
    }

    fn advisory(
        &self,
        update_available: bool,
        current: Option<&Channel>,
        newer: Option<&Channel>,
        notes: String,
    ) -> Advisory {
        Advisory::new(
            update_available,
            self.default_channel(),
            current,
            newer,
            notes,
            self.snap_name,
        )
    }

    /// The rolling track auto-upgrades across breaking releases, so its users
    /// are always asked to move to a fixed track.
    fn leave_latest_track(&self, current: &Channel) -> Advisory {
        let target = self
            .default_channel()
            .map(|channel| channel.to_string())
            .unwrap_or_else(|| "<channel>".to_string());

        let notes = format!(
            "You're on the channel «{current}», please consider switching to «{target}». \
             Switch with: `sudo snap switch {snap} --channel={target}`. \
             Staying on {current} will auto-upgrade your installation, which can cause it to \
             stop working because of breaking changes.",
            current = current,
            target = target,
            snap = self.snap_name,
        );
        warn!("{}", notes);

        self.advisory(false, Some(current), None, notes)
    }

    fn resolve_known(&self, current: &Channel) -> Advisory {
        let in_track = self
            .graph
            .track(current.track().as_str())
            .map(|track| track.channel_with_higher_revision(current))
            .filter(|newer| newer.is_newer_than(current));

        let newer = in_track.or_else(|| {
            self.graph
                .channel_with_higher_revision(current)
                .filter(|newer| newer.is_newer_than(current))
        });

        match newer {
            Some(newer) => {
                let notes = format!(
                    "You're currently on _«{}»_ and can upgrade to _«{}»_. \
                     Update with `sudo snap switch {} --channel={}`.",
                    current.describe(),
                    newer.describe(),
                    self.snap_name,
                    newer
                );
                self.advisory(true, Some(current), Some(newer), notes)
            }
            None => {
                debug!("Revision {} is the newest for {}", current.revision(), current);
                // The current channel doubles as "newer" so the running version is reported
                self.advisory(
                    false,
                    None,
                    Some(current),
                    format!("You're on _«{}»_!", current.describe()),
                )
            }
        }
    }

    fn resolve_unknown(&self, current_revision: u64, current_version: &Version) -> Advisory {
        let version_line = current_version
            .major_minor()
            .unwrap_or_else(|| current_version.to_string());

        if let Some(current) = self.graph.track(&version_line).and_then(Track::latest) {
            return match self.graph.channel_with_higher_revision(current) {
                Some(newer) if newer.is_newer_than(current) => {
                    let notes = format!(
                        "Unknown revision «{}», assuming on any channel for {}. The snap package \
                         should automatically update, but you can also upgrade to _«{}»_ with: \
                         `sudo snap switch {} --channel={}`.",
                        current_revision,
                        current.track(),
                        newer.describe(),
                        self.snap_name,
                        newer
                    );
                    self.advisory(true, Some(current), Some(newer), notes)
                }
                _ => {
                    let notes = format!(
                        "Unknown revision «{}», assuming on any channel for track {}. The snap \
                         package should automatically update, but double check that the channel \
                         is not closed. You can force the update with: `sudo snap refresh {}` \
                         and find channels with: `snap info {}`.",
                        current_revision,
                        current.track(),
                        self.snap_name,
                        self.snap_name
                    );
                    self.advisory(true, Some(current), None, notes)
                }
            };
        }

        let nearest = self
            .graph
            .track_with_lower_revision(current_revision)
            .and_then(|older| self.graph.channel_with_higher_revision(older))
            .map(|newer| {
                self.graph
                    .track(newer.track().as_str())
                    .and_then(Track::latest)
                    .unwrap_or(newer)
            });

        if let Some(newer) = nearest {
            let notes = format!(
                "No channel found for {}, it might have been deleted - and you will not receive \
                 updates. A newer channel _«{}»_ is available! You can switch with: \
                 `sudo snap refresh {} --channel={}`.",
                version_line,
                newer.describe(),
                self.snap_name,
                newer
            );
            return self.advisory(true, None, Some(newer), notes);
        }

        let notes = format!(
            "No channel found for «{}» ({}). Please consult `snap info {}` to find a suitable \
             track to upgrade to, and switch channel with: `snap switch {} --channel=<channel>`.",
            current_revision, version_line, self.snap_name, self.snap_name
        );
        self.advisory(true, None, None, notes)
    }
}
