use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request to the snap store timed out")]
    Timeout,

    #[error("Snap not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Received invalid JSON from the snap store: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Got unexpected response: {0}")]
    Schema(#[source] serde_json::Error),
}

impl StoreError {
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            StoreError::Timeout
        } else {
            StoreError::Network(error)
        }
    }
}

/// Reasons an update check fails. The previous advisory is kept when one of
/// these is returned.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Missing {0} environment variable")]
    MissingEnvironment(&'static str),

    #[error("Invalid snap revision: {0:?}")]
    InvalidRevision(String),

    #[error("Cannot map locally built revision {0:?} to a store revision")]
    UnresolvedLocalRevision(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("checkInterval must be at least 1 millisecond")]
    ZeroCheckInterval,
}
