pub mod config;
pub mod error;
pub mod snap;
pub mod store;
pub mod updater;
