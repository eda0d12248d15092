//! Snap channel map model
//!
//! ```text
//! ┌──────────────┐      ┌─────────────┐      ┌─────────────┐
//! │ ChannelGraph │─────▶│    Track    │─────▶│   Channel   │
//! │ (all tracks) │      │ (0.118,...) │      │ (risk, rev) │
//! └──────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`channel`]: A single release point and its partial "newer than" order
//! - [`graph`]: Cross-track queries used to find upgrade candidates
//! - [`metadata`]: Serde model of the Snap Store response
//! - [`risk`]: Risk levels (stable, candidate, beta, edge, latest)
//! - [`track`]: Channels sharing a track label
//! - [`version`]: Version-like values for versions and track names

pub mod channel;
pub mod graph;
pub mod metadata;
pub mod risk;
pub mod track;
pub mod version;

pub use channel::Channel;
pub use graph::ChannelGraph;
pub use metadata::{ChannelDescriptor, ChannelMapEntry, SnapInfo};
pub use risk::Risk;
pub use track::Track;
pub use version::Version;
