// src/utils/mod.rs
//! Utilities module for common functionality
//!
//! Error types shared by the library and the command-line front end, and the
//! logging setup.

/// Error types and handling utilities
///
/// Holds the domain errors of the hash engine and registry, and
/// [`NodeError`] which the binary propagates.
pub mod error;

/// Logging configuration and utilities
pub mod logging;

pub use error::{
    AlgorithmError, HashError, LookupError, NodeError, RegistryError, TargetError,
    ValidationError,
};
pub use logging::{init_bench_logging, init_logging};
