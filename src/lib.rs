//! Feathercoin proof-of-work hash engine
//!
//! This crate provides the consensus-critical digest computation of a
//! Feathercoin node:
//! - An open registry mapping profile identifiers to algorithms (Scrypt, NeoScrypt)
//! - A one-time availability probe per algorithm
//! - A stateless hash engine returning typed errors instead of placeholder digests
//! - Difficulty target decoding and header validation
//! - The bootstrap seed-peer list used as a last-resort discovery path

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Hashing core: algorithms, registry, engine, targets
pub mod pow;

/// Bootstrap peer discovery
pub mod discovery;

/// Statistics collection and reporting functionality
pub mod stats;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

// Core exports
pub use cli::Commands;
pub use config::Config;
pub use discovery::SeedPeers;
pub use pow::{Algorithm, Availability, HashEngine, Registry, RegistryBuilder, Target, verify_header};
pub use stats::{HardwareStats, HashStats, StatsReporter};
pub use types::{Digest, Network, Profile};
pub use utils::{
    AlgorithmError, HashError, LookupError, NodeError, RegistryError, ValidationError,
    init_logging,
};
