//! Statistics collection and reporting module
//!
//! Tracks hashing throughput and samples hardware load for the benchmark
//! command. The main component is [`StatsReporter`].

/// Submodule containing the statistics reporter implementation
///
/// The reporter handles:
/// - Atomic collection of hash counts fed over a channel
/// - Hardware monitoring
/// - Periodic reporting of stats
pub mod reporter;

// Re-export main components
pub use reporter::{HardwareStats, HashFeed, HashStats, StatsReporter};
