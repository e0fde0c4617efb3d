// src/config/mod.rs
//! Configuration management for the node
//!
//! The configuration is a small TOML file choosing the network, the
//! proof-of-work profile and the front end's worker/logging settings.
//! Command-line flags override individual values.

/// Core configuration implementation
pub mod config;

pub use config::Config;

use crate::utils::error::NodeError;
use std::path::PathBuf;

/// Loads node configuration from a TOML file, or defaults if it is absent
///
/// # Arguments
/// * `path` - Path to the configuration file (anything convertible to PathBuf)
pub fn load(path: impl Into<PathBuf>) -> Result<Config, NodeError> {
    Config::load_or_default(path)
}

/// Generates a commented configuration template
pub fn generate_template() -> String {
    Config::generate_template()
}
