// src/cli/mod.rs
//! Command-line interface definitions

/// Argument structures parsed with clap
pub mod commands;

pub use commands::{
    Action, BenchmarkOptions, Commands, ConfigOptions, HashOptions, PeersOptions, ProbeOptions,
    VerifyOptions,
};
