// src/discovery/mod.rs
//! Peer discovery
//!
//! Only the last-resort path lives here: a fixed list of long-running seed
//! nodes. DNS and other discovery mechanisms sit outside this crate.

/// Hard-coded bootstrap seeds
pub mod seed;

pub use seed::{MAINNET_SEEDS, SeedPeers, seed_to_ipv4};
