// src/pow/mod.rs
//! Proof-of-work hashing core
//!
//! Data flows one way: consumer → [`HashEngine`] → [`Registry`] lookup →
//! [`Algorithm`] backend → digest. The registry is built and probed once;
//! everything after that is read-only and safe to share across threads.

/// Algorithm backends and their common trait
pub mod algorithm;

/// Engine facade used by miners and validators
pub mod engine;

/// Profile registry with one-time availability probing
pub mod registry;

/// Difficulty targets and header validation
pub mod target;

pub use self::algorithm::{Algorithm, KnownAnswer};
pub use self::engine::HashEngine;
pub use self::registry::{Availability, Descriptor, Registry, RegistryBuilder};
pub use self::target::{Target, verify_header};
