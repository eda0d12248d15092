use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::error::{CheckError, ConfigError};
use crate::snap::version::Version;

// =============================================================================
// Store-related constants
// =============================================================================

/// Default base URL of the Snap Store API
pub const DEFAULT_STORE_URL: &str = "https://api.snapcraft.io";

/// Snap whose channel map is checked
pub const DEFAULT_SNAP_NAME: &str = "home-assistant-snap";

/// Release notes shown with every advisory
pub const RELEASE_NOTES_URL: &str = "https://www.home-assistant.io/blog/categories/core/";

// =============================================================================
// Time-related constants
// =============================================================================

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Default interval between update checks in milliseconds (45 seconds)
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 45_000;

// =============================================================================
// Development fallbacks
// =============================================================================

/// Revision assumed when running a development build outside a snap
pub const DEV_SNAP_REVISION: u64 = 327;

/// Architecture assumed when running a development build outside a snap
pub const DEV_SNAP_ARCH: &str = "amd64";

/// Updater configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdaterConfig {
    pub snap_name: String,
    pub store_url: String,
    /// Check interval in milliseconds
    pub check_interval: u64,
    /// Deprecated analytics option, accepted and ignored
    pub reporting: Option<bool>,
    /// Deprecated analytics option, accepted and ignored
    pub include_used_components: Option<bool>,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            snap_name: DEFAULT_SNAP_NAME.to_string(),
            store_url: DEFAULT_STORE_URL.to_string(),
            check_interval: DEFAULT_CHECK_INTERVAL_MS,
            reporting: None,
            include_used_components: None,
        }
    }
}

impl UpdaterConfig {
    /// Load configuration from a JSON file. Missing keys use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        if config.check_interval == 0 {
            return Err(ConfigError::ZeroCheckInterval);
        }
        config.warn_deprecated();
        Ok(config)
    }

    /// Interval between checks, never shorter than 1 ms
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval.max(1))
    }

    /// Names of deprecated options present in this configuration
    pub fn deprecated_options(&self) -> Vec<&'static str> {
        let mut options = Vec::new();
        if self.include_used_components.is_some() {
            options.push("includeUsedComponents");
        }
        if self.reporting.is_some() {
            options.push("reporting");
        }
        options
    }

    fn warn_deprecated(&self) {
        for option in self.deprecated_options() {
            warn!(
                "Analytics reporting with the option '{}' is deprecated and you should remove \
                 it from your configuration. The updater no longer reports analytics.",
                option
            );
        }
    }
}

/// A snap revision as reported by snapd
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapRevision {
    /// Revision published by the store
    Store(u64),
    /// Locally installed build (`x1`, `x2`, ...), unknown to the store
    Local(String),
}

impl SnapRevision {
    pub fn parse(raw: &str) -> Result<Self, CheckError> {
        let raw = raw.trim();
        if raw.starts_with('x') {
            return Ok(SnapRevision::Local(raw.to_string()));
        }
        raw.parse()
            .map(SnapRevision::Store)
            .map_err(|_| CheckError::InvalidRevision(raw.to_string()))
    }
}

/// Host environment of the running snap
#[derive(Debug, Clone, PartialEq)]
pub struct SnapEnvironment {
    pub revision: SnapRevision,
    pub architecture: String,
    pub current_version: Version,
}

impl SnapEnvironment {
    /// Read `SNAP_REVISION` and `SNAP_ARCH` from the process environment
    pub fn from_env(current_version: &str) -> Result<Self, CheckError> {
        Self::from_lookup(current_version, |key| std::env::var(key).ok())
    }

    /// Build the environment from `lookup`.
    ///
    /// Missing values are an error unless `current_version` is a development
    /// build, which falls back to [`DEV_SNAP_REVISION`] and [`DEV_SNAP_ARCH`].
    pub fn from_lookup(
        current_version: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CheckError> {
        let current_version = Version::parse(current_version);
        let is_dev = current_version.is_dev();

        let revision = match lookup("SNAP_REVISION") {
            Some(raw) => SnapRevision::parse(&raw)?,
            None if is_dev => {
                warn!("Development, using SNAP_REVISION: {}", DEV_SNAP_REVISION);
                SnapRevision::Store(DEV_SNAP_REVISION)
            }
            None => return Err(CheckError::MissingEnvironment("SNAP_REVISION")),
        };

        let architecture = match lookup("SNAP_ARCH") {
            Some(arch) => arch,
            None if is_dev => {
                warn!("Development, using SNAP_ARCH: {}", DEV_SNAP_ARCH);
                DEV_SNAP_ARCH.to_string()
            }
            None => return Err(CheckError::MissingEnvironment("SNAP_ARCH")),
        };

        Ok(Self {
            revision,
            architecture,
            current_version,
        })
    }
}

/// Returns the path to the data directory for snap-updater.
/// Uses $XDG_DATA_HOME/snap-updater if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/snap-updater,
/// or ./snap-updater if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("snap-updater.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("snap-updater")
}
