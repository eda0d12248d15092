//! Update checking for the running snap
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ Coordinator │────▶│    Check     │────▶│   Advisor   │
//! │  (polling)  │     │ (env, fetch) │     │  (resolve)  │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!                            │                    │
//!                            ▼                    ▼
//!                     ┌─────────────┐      ┌─────────────┐
//!                     │    Store    │      │  Advisory   │
//!                     │(channel map)│      │  (result)   │
//!                     └─────────────┘      └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`advisor`]: Finds the channel to recommend for a running revision
//! - [`advisory`]: The recommendation handed to the presentation layer
//! - [`check`]: A single update check against the store
//! - [`coordinator`]: Periodic, non-overlapping checks keeping the last result

pub mod advisor;
pub mod advisory;
pub mod check;
pub mod coordinator;

pub use advisor::UpgradeAdvisor;
pub use advisory::Advisory;
pub use check::{announce_replacement, check_new_version};
pub use coordinator::UpdateCoordinator;
