//! Shared library for `MindMap Explorer`
//! Contains the tree model, layout engine, interaction controller, render
//! adapter, and the AI/search collaborators used by the CLI.

pub mod core;
pub mod logger;

pub use crate::core::config;
pub use crate::core::get_version;
