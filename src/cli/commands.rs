// src/cli/commands.rs
use crate::types::{Network, Profile};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Feathercoin proof-of-work node tools
#[derive(Parser, Debug)]
#[command(name = "ftc-pow")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// The action to perform
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Hash hex-encoded input with a proof-of-work profile
    Hash(HashOptions),

    /// Check a hex-encoded header against a difficulty target
    Verify(VerifyOptions),

    /// Show which profiles are registered and whether they passed their probe
    Probe(ProbeOptions),

    /// List the bootstrap seed peers
    Peers(PeersOptions),

    /// Measure hash rate for a profile
    Benchmark(BenchmarkOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Options for hashing a single input
#[derive(Parser, Debug)]
pub struct HashOptions {
    /// Input bytes as hex (may be empty)
    #[arg(default_value = "")]
    pub input: String,

    /// Profile to hash with (overrides config)
    #[arg(short, long)]
    pub profile: Option<Profile>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for validating a header
#[derive(Parser, Debug)]
pub struct VerifyOptions {
    /// Serialized header as hex
    pub header: String,

    /// Profile declared for the header (overrides config)
    #[arg(short, long)]
    pub profile: Option<Profile>,

    /// Compact target (nBits), e.g. 0x1e0fffff
    #[arg(short, long, conflicts_with = "target", value_parser = parse_bits)]
    pub bits: Option<u32>,

    /// Full target as 64 big-endian hex characters
    #[arg(short, long)]
    pub target: Option<String>,
}

/// Options for listing registry state
#[derive(Parser, Debug)]
pub struct ProbeOptions {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for listing seed peers
#[derive(Parser, Debug)]
pub struct PeersOptions {
    /// Network whose seeds to list (overrides config)
    #[arg(short, long)]
    pub network: Option<Network>,

    /// Only take this many peers from the sequential walk
    #[arg(long)]
    pub count: Option<usize>,
}

/// Options for running hashing benchmarks
#[derive(Parser, Debug)]
pub struct BenchmarkOptions {
    /// Profile to benchmark (overrides config)
    #[arg(short, long)]
    pub profile: Option<Profile>,

    /// Duration of benchmark in seconds
    #[arg(short, long, default_value_t = 10)]
    pub duration: u64,

    /// Number of threads to use (overrides config)
    #[arg(short, long)]
    pub threads: Option<usize>,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "config.toml")]
    pub output: PathBuf,
}

fn parse_bits(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => u32::from_str_radix(s, 16),
    };
    parsed.map_err(|e| format!("invalid compact target '{}': {}", s, e))
}
