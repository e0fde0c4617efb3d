// src/pow/algorithm/scrypt.rs
//! Scrypt algorithm implementation
//!
//! Litecoin-style block hashing: the serialized header is both the password
//! and the salt, and the 32-byte derived key is the digest. Profile `0x3`
//! selects N=1024, r=1, p=1.

use crate::pow::algorithm::{Algorithm, KnownAnswer};
use crate::types::{DIGEST_LEN, Digest};
use crate::utils::error::AlgorithmError;
use hex_literal::hex;
use scrypt::Params;

/// scrypt(password = "", salt = "", N = 1024, r = 1, p = 1, dkLen = 32)
const EMPTY_INPUT_DIGEST: [u8; DIGEST_LEN] =
    hex!("b34ab7cd1ce0c308146ab970fa75517bcf20f95c7ed7a34efc0d5f096469b2e1");

/// Scrypt algorithm implementation
///
/// Holds only the cost parameters; the memory-hard scratch area is allocated
/// by the `scrypt` crate on every call.
#[derive(Clone)]
pub struct ScryptAlgo {
    params: Params,
    log_n: u8,
    r: u32,
    p: u32,
}

impl ScryptAlgo {
    /// Creates a Scrypt instance with explicit cost parameters
    ///
    /// # Arguments
    /// * `log_n` - log2 of the CPU/memory cost N
    /// * `r` - block size factor
    /// * `p` - parallelization factor
    ///
    /// # Errors
    /// Returns `AlgorithmError::Backend` if the parameters are rejected by the
    /// scrypt implementation.
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self, AlgorithmError> {
        let params = Params::new(log_n, r, p, DIGEST_LEN)
            .map_err(|e| AlgorithmError::Backend(format!("invalid scrypt parameters: {}", e)))?;
        Ok(Self { params, log_n, r, p })
    }

    /// N=1024, r=1, p=1, the parameters behind profile `0x3`
    pub fn litecoin() -> Result<Self, AlgorithmError> {
        Self::new(10, 1, 1)
    }

    fn is_litecoin(&self) -> bool {
        self.log_n == 10 && self.r == 1 && self.p == 1
    }
}

impl Algorithm for ScryptAlgo {
    fn name(&self) -> &'static str {
        "scrypt"
    }

    fn compute(&self, input: &[u8]) -> Result<Digest, AlgorithmError> {
        let mut output = [0u8; DIGEST_LEN];
        scrypt::scrypt(input, input, &self.params, &mut output)
            .map_err(|e| AlgorithmError::Backend(format!("scrypt failed: {}", e)))?;
        Ok(Digest::from_bytes(output))
    }

    fn known_answer(&self) -> Option<KnownAnswer> {
        self.is_litecoin().then_some(KnownAnswer {
            input: b"",
            expected: EMPTY_INPUT_DIGEST,
        })
    }
}
