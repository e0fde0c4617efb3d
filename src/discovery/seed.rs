// src/discovery/seed.rs
//! Fixed bootstrap peer list
//!
//! Long-lived mainnet nodes, consulted only when every other discovery path
//! has failed. The list is walked once: after the last entry [`SeedPeers::next_peer`]
//! keeps returning `None`, and there is no way to rewind short of building a
//! new `SeedPeers`.

use crate::types::Network;
use std::iter::FusedIterator;
use std::net::{Ipv4Addr, SocketAddrV4};

/// Mainnet seed nodes as little-endian packed IPv4 addresses
///
/// Order and repeated entries are kept as published.
pub const MAINNET_SEEDS: [u32; 48] = [
    0xc49c0ed8, 0x1df9d243, 0xd9b75a40, 0xdc525e46, 0x72c321b1, 0x4eedeeb2, 0x18271787, 0xce725232,
    0x892aafc0, 0x979f6751, 0x2210f618, 0xfb529ed8, 0x66a74b3e, 0xef5d132e, 0x3b7a116c, 0x2fe45f55,
    0x1df9d243, 0xe41f7c70, 0x8f4cd262, 0xb5c29d62, 0x80f1f3a2, 0x47dc614d, 0x6f458b4e, 0x908caa56,
    0x553ef762, 0x5aec0852, 0x629a4f54, 0x6a10e13c, 0x4f41c547, 0x4476fd59, 0xcaedbc5a, 0x9f806dc1,
    0x1df9d243, 0xe41f7c70, 0x8f4cd262, 0xb5c29d62, 0x80f1f3a2, 0x47dc614d, 0x6f458b4e, 0x908caa56,
    0x553ef762, 0x5aec0852, 0x629a4f54, 0x6a10e13c, 0x4f41c547, 0x4476fd59, 0xcaedbc5a, 0x9f806dc1,
];

/// Converts a packed seed into an address; the lowest byte is the first octet
pub fn seed_to_ipv4(seed: u32) -> Ipv4Addr {
    Ipv4Addr::from(seed.to_le_bytes())
}

/// Sequential, single-pass view over a fixed seed list
#[derive(Debug, Clone)]
pub struct SeedPeers {
    seeds: Vec<u32>,
    port: u16,
    cursor: usize,
}

impl SeedPeers {
    /// Seed list and port for `network`
    ///
    /// Only mainnet ships seeds; testnet yields an empty list.
    pub fn new(network: Network) -> Self {
        let seeds = match network {
            Network::Mainnet => MAINNET_SEEDS.to_vec(),
            Network::Testnet => Vec::new(),
        };
        Self::with_seeds(seeds, network.port())
    }

    /// Custom seed list, e.g. for private networks
    pub fn with_seeds(seeds: Vec<u32>, port: u16) -> Self {
        log::debug!("Loaded {} bootstrap seeds on port {}", seeds.len(), port);
        Self {
            seeds,
            port,
            cursor: 0,
        }
    }

    /// Next address in the list, or `None` once the list has been walked
    pub fn next_peer(&mut self) -> Option<SocketAddrV4> {
        let seed = *self.seeds.get(self.cursor)?;
        self.cursor += 1;
        Some(SocketAddrV4::new(seed_to_ipv4(seed), self.port))
    }

    /// Every address in list order, regardless of the cursor
    pub fn all_peers(&self) -> Vec<SocketAddrV4> {
        self.seeds
            .iter()
            .map(|&seed| SocketAddrV4::new(seed_to_ipv4(seed), self.port))
            .collect()
    }

    /// Entries [`SeedPeers::next_peer`] has yet to return
    pub fn remaining(&self) -> usize {
        self.seeds.len() - self.cursor
    }

    /// `true` once the sequential walk has passed the last entry
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Total number of seeds
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// `true` if the list has no entries at all
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

impl Iterator for SeedPeers {
    type Item = SocketAddrV4;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_peer()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl FusedIterator for SeedPeers {}
