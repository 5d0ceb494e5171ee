//! Core module: domain logic shared by the CLI and library consumers

pub mod ai;
pub mod config;
pub mod guide;
pub mod interaction;
pub mod layout;
pub mod models;
pub mod render;
pub mod search;

/// Returns the current version of the `MindMap Explorer` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
