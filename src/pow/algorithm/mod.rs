// src/pow/algorithm/mod.rs
//! Proof-of-work algorithm backends
//!
//! Every backend implements [`Algorithm`]. Currently implements:
//! - Scrypt (Litecoin parameters, profile `0x3`)
//! - NeoScrypt (Feathercoin, profiles `0x0` and `0x80000620`)

/// Scrypt algorithm implementation
///
/// The input doubles as the salt, as in Litecoin-style block hashing.
pub mod scrypt;

/// NeoScrypt algorithm implementation
///
/// FastKDF-BLAKE2s around a ChaCha20/Salsa20 double SMix.
pub mod neoscrypt;

use crate::types::{DIGEST_LEN, Digest};
use crate::utils::error::AlgorithmError;

/// Input/output pair a backend must reproduce to pass its probe
#[derive(Debug, Clone, Copy)]
pub struct KnownAnswer {
    /// Bytes fed to [`Algorithm::compute`]
    pub input: &'static [u8],
    /// Digest the backend must return
    pub expected: [u8; DIGEST_LEN],
}

/// Common interface for all proof-of-work algorithms
///
/// Implementations must be pure: no shared mutable state between calls,
/// identical input always yields an identical digest, and concurrent calls
/// from many threads are safe. Scratch memory belongs to a single call.
pub trait Algorithm: Send + Sync {
    /// Short human-readable name, used in logs and conflict reports
    fn name(&self) -> &'static str;

    /// Compute the digest of `input`
    ///
    /// # Arguments
    /// * `input` - Serialized header or candidate, any length
    ///
    /// # Returns
    /// 32-byte digest, or an error if the backend cannot process the input
    fn compute(&self, input: &[u8]) -> Result<Digest, AlgorithmError>;

    /// Test vector checked by [`Algorithm::self_test`]
    fn known_answer(&self) -> Option<KnownAnswer> {
        None
    }

    /// One-time capability probe run before the registry is published
    ///
    /// The default recomputes [`Algorithm::known_answer`]. Backends without a
    /// vector hash a zero 80-byte header twice and require equal results.
    fn self_test(&self) -> Result<(), AlgorithmError> {
        match self.known_answer() {
            Some(kat) => {
                let digest = self.compute(kat.input)?;
                if digest.as_bytes() != &kat.expected {
                    return Err(AlgorithmError::Backend(format!(
                        "{} self-test mismatch: got {}, expected {}",
                        self.name(),
                        digest,
                        hex::encode(kat.expected)
                    )));
                }
                Ok(())
            }
            None => {
                let header = [0u8; 80];
                let first = self.compute(&header)?;
                let second = self.compute(&header)?;
                if first != second {
                    return Err(AlgorithmError::Backend(format!(
                        "{} is not deterministic",
                        self.name()
                    )));
                }
                Ok(())
            }
        }
    }
}
