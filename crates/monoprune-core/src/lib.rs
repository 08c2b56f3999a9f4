//! Core types and configuration for monoprune.
//!
//! This crate defines the workspace layout read from `nx.json`
//! ([`WorkspaceLayout`]), per-project manifests ([`ProjectConfiguration`]),
//! the `monoprune.toml` schema ([`MonopruneConfig`]), and shared error types.

pub mod config;
pub mod error;
pub mod layout;
pub mod project;

pub use config::{
    ContextConfig, DEFAULT_SENTINEL, MonopruneConfig, OutputConfig, OutputLayout, OutputPolicy,
};
pub use error::{Error, Result};
pub use layout::{WorkspaceConfig, WorkspaceLayout, is_plain_relative};
pub use project::{ProjectConfiguration, check_project_name};
