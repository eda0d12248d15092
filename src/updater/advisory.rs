//! The resolved update recommendation

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RELEASE_NOTES_URL;
use crate::snap::channel::Channel;

pub const ATTR_RELEASE_NOTES: &str = "release_notes";
pub const ATTR_NEWEST_VERSION: &str = "newest_version";
pub const ATTR_UPDATE_NOTES: &str = "update_notes";

/// Whether an update is available and what to do about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub update_available: bool,
    /// Version of the suggested channel, or of the default channel when there
    /// is no suggestion
    pub newest_version: Option<String>,
    /// Markdown notes with the `snap switch` command to run
    pub update_notes: String,
    pub release_notes: String,
}

impl Advisory {
    /// Build an advisory from the channels involved in a resolution.
    ///
    /// `default` is the top channel of the snap's default track. Depending on
    /// how it relates to `current` and `newer`, a pointer to it is appended to
    /// `update_notes`.
    pub fn new(
        update_available: bool,
        default: Option<&Channel>,
        current: Option<&Channel>,
        newer: Option<&Channel>,
        update_notes: String,
        snap_name: &str,
    ) -> Self {
        let newest_version = newer
            .or(default)
            .map(|channel| channel.version().to_string());

        let mut update_notes = update_notes;
        if let Some(default) = default {
            match (current, newer) {
                (_, Some(newer)) if default.is_newer_than(newer) => {
                    update_notes.push_str(&format!(
                        "\n\nLatest channel is: _«{}»_.",
                        default.describe()
                    ));
                }
                (Some(current), None) if default.is_newer_than(current) => {
                    update_notes.push_str(&format!(
                        "\n\nLatest channel is: _«{}»_. Upgrade with: `snap switch {} --channel={}`",
                        default.describe(),
                        snap_name,
                        default
                    ));
                }
                (None, None) => {
                    update_notes.push_str(&format!(
                        "\n\nLatest channel is: _«{}»_.",
                        default.describe()
                    ));
                }
                _ => {}
            }
        }

        if update_available {
            info!(
                "UPDATE AVAILABLE: newer: {}, current: {}, default: {}, notes: {}",
                display_or_none(newer),
                display_or_none(current),
                display_or_none(default),
                update_notes
            );
        }

        Self {
            update_available,
            newest_version,
            update_notes,
            release_notes: RELEASE_NOTES_URL.to_string(),
        }
    }

    /// State attributes for presentation, skipping empty values
    pub fn attributes(&self) -> IndexMap<&'static str, String> {
        let mut attributes = IndexMap::new();

        if !self.release_notes.is_empty() {
            attributes.insert(ATTR_RELEASE_NOTES, self.release_notes.clone());
        }

        if let Some(newest_version) = self.newest_version.as_ref().filter(|v| !v.is_empty()) {
            attributes.insert(ATTR_NEWEST_VERSION, newest_version.clone());
        }

        if !self.update_notes.is_empty() {
            attributes.insert(ATTR_UPDATE_NOTES, self.update_notes.clone());
        }

        attributes
    }
}

fn display_or_none(channel: Option<&Channel>) -> String {
    channel
        .map(|c| c.to_string())
        .unwrap_or_else(|| "none".to_string())
}
