// src/config/config.rs
use crate::types::{Network, Profile};
use crate::utils::error::NodeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the node
///
/// Selects the network, the proof-of-work profile headers are hashed and
/// validated with, and the worker/logging settings of the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Network to join (`mainnet` or `testnet`)
    #[serde(default = "default_network")]
    pub network: Network,

    /// Proof-of-work profile, as a number, hex string or name
    /// (default: `neoscrypt`, i.e. `0x80000620`)
    #[serde(default = "default_profile")]
    pub profile: Profile,

    /// Number of hashing threads for benchmarks
    /// (default: number of CPU cores)
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Log level used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_network() -> Network {
    Network::Mainnet
}

fn default_profile() -> Profile {
    Profile::NEOSCRYPT_FTC
}

fn default_worker_threads() -> usize {
    num_cpus::get()
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            network: default_network(),
            profile: default_profile(),
            worker_threads: default_worker_threads(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Loads configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(NodeError)` - If file couldn't be read, parsed or validated
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, NodeError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            NodeError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_str)
            .map_err(|e| NodeError::ConfigError(format!("Invalid config format: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, NodeError> {
        let path = path.into();
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), NodeError> {
        if self.worker_threads == 0 {
            return Err(NodeError::ConfigError(
                "worker_threads must be at least 1".into(),
            ));
        }
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(NodeError::ConfigError(format!(
                "Unknown log level: {}",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Generates a configuration template string
    ///
    /// # Returns
    /// String containing a commented TOML configuration template
    pub fn generate_template() -> String {
        let mut template = String::new();
        template.push_str("# Feathercoin PoW node configuration\n\n");
        template.push_str("# Network: mainnet, testnet\n");
        template.push_str("network = \"mainnet\"\n");
        template.push_str("# Proof-of-work profile: scrypt (0x3), neoscrypt (0x80000620), 0x0\n");
        template.push_str("profile = \"0x80000620\"\n");
        template.push_str("# Hashing threads used by the benchmark\n");
        template.push_str(&format!("worker_threads = {}\n", num_cpus::get()));
        template.push_str("# Log level when RUST_LOG is not set\n");
        template.push_str("log_level = \"info\"\n");
        template
    }
}
