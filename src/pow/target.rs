// src/pow/target.rs
//! Difficulty targets and header validation
//!
//! The engine knows nothing about difficulty. This module is the validation
//! side of the contract: hash the received header, then accept it only if the
//! digest, read as a little-endian 256-bit integer, does not exceed the target.

use crate::pow::engine::HashEngine;
use crate::types::{DIGEST_LEN, Digest, Profile};
use crate::utils::error::{TargetError, ValidationError};
use std::fmt;
use std::str::FromStr;

/// 256-bit proof-of-work threshold, stored little-endian
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Target([u8; DIGEST_LEN]);

impl Target {
    /// Target that every digest meets
    pub const MAX: Target = Target([0xFF; DIGEST_LEN]);

    /// Wraps little-endian target bytes
    pub const fn from_le_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Target(bytes)
    }

    /// Little-endian target bytes
    pub const fn as_le_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Decodes a compact `nBits` value
    ///
    /// The top byte is the length in bytes, the low 23 bits the mantissa and
    /// bit 23 the sign.
    ///
    /// # Errors
    /// * `TargetError::Negative` - sign bit set with a non-zero mantissa
    /// * `TargetError::Overflow` - the value does not fit in 256 bits
    pub fn from_compact(bits: u32) -> Result<Self, TargetError> {
        let size = (bits >> 24) as usize;
        let mut mantissa = bits & 0x007F_FFFF;

        if mantissa != 0 && bits & 0x0080_0000 != 0 {
            return Err(TargetError::Negative(bits));
        }
        if mantissa != 0
            && (size > 34 || (mantissa > 0xFF && size > 33) || (mantissa > 0xFFFF && size > 32))
        {
            return Err(TargetError::Overflow(bits));
        }

        let mut bytes = [0u8; DIGEST_LEN];
        let offset = if size <= 3 {
            mantissa >>= 8 * (3 - size);
            0
        } else {
            size - 3
        };
        for (k, byte) in mantissa.to_le_bytes().iter().take(3).enumerate() {
            if *byte != 0 {
                bytes[offset + k] = *byte;
            }
        }
        Ok(Target(bytes))
    }

    /// Parses the big-endian hex rendering (64 hex characters)
    pub fn from_hex(s: &str) -> Result<Self, TargetError> {
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s.trim(), &mut bytes).map_err(|e| TargetError::Hex(e.to_string()))?;
        bytes.reverse();
        Ok(Target(bytes))
    }

    /// `true` if `digest <= self` as little-endian 256-bit integers
    pub fn is_met_by(&self, digest: &Digest) -> bool {
        let hash = digest.as_bytes();
        for i in (0..DIGEST_LEN).rev() {
            if hash[i] != self.0[i] {
                return hash[i] < self.0[i];
            }
        }
        true
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut be = self.0;
        be.reverse();
        f.write_str(&hex::encode(be))
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::from_hex(s)
    }
}

/// Validates a received header against its target
///
/// A header whose digest cannot be computed is rejected as unverifiable;
/// engine errors never count as a pass.
///
/// # Returns
/// The digest on success, so callers can log or index it
pub fn verify_header(
    engine: &HashEngine,
    header: &[u8],
    profile: Profile,
    target: &Target,
) -> Result<Digest, ValidationError> {
    let digest = engine.hash(header, profile)?;
    if !target.is_met_by(&digest) {
        log::debug!("Header digest {} above target {}", digest, target);
        return Err(ValidationError::InsufficientWork {
            digest,
            target: target.to_string(),
        });
    }
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::HashError;

    #[test]
    fn decodes_feathercoin_pow_limit() {
        // ~uint256(0) >> 20
        let target = Target::from_compact(0x1e0f_ffff).unwrap();
        assert_eq!(
            target.to_string(),
            "00000fffff000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn decodes_small_exponents() {
        let target = Target::from_compact(0x0312_3456).unwrap();
        assert_eq!(&target.as_le_bytes()[..4], &[0x56, 0x34, 0x12, 0x00]);

        let target = Target::from_compact(0x0112_3456).unwrap();
        assert_eq!(&target.as_le_bytes()[..2], &[0x12, 0x00]);

        assert_eq!(Target::from_compact(0).unwrap(), Target::from_le_bytes([0; 32]));
    }

    #[test]
    fn rejects_negative_and_overflowing_encodings() {
        assert_eq!(
            Target::from_compact(0x0492_3456),
            Err(TargetError::Negative(0x0492_3456))
        );
        assert_eq!(
            Target::from_compact(0xff12_3456),
            Err(TargetError::Overflow(0xff12_3456))
        );
        // Sign bit with zero mantissa is just zero
        assert!(Target::from_compact(0x0180_0000).is_ok());
    }

    #[test]
    fn hex_form_is_big_endian() {
        let text = "00000fffff000000000000000000000000000000000000000000000000000000";
        let target: Target = text.parse().unwrap();
        assert_eq!(target, Target::from_compact(0x1e0f_ffff).unwrap());
        assert!(Target::from_hex("zz").is_err());
    }

    #[test]
    fn comparison_reads_digest_as_little_endian() {
        let target = Target::from_compact(0x1e0f_ffff).unwrap();

        let mut low = [0xFFu8; 32];
        low[31] = 0x00;
        low[30] = 0x00;
        low[29] = 0x0E;
        assert!(target.is_met_by(&Digest::from_bytes(low)));

        let mut high = [0u8; 32];
        high[31] = 0x01;
        assert!(!target.is_met_by(&Digest::from_bytes(high)));

        let equal = Digest::from_bytes(*target.as_le_bytes());
        assert!(target.is_met_by(&equal));
        assert!(Target::MAX.is_met_by(&Digest::from_bytes([0xFF; 32])));
    }

    #[test]
    fn unknown_profile_is_unverifiable_never_a_pass() {
        let engine = HashEngine::with_defaults().unwrap();
        let err = verify_header(&engine, &[0u8; 80], Profile::new(0x9999), &Target::MAX)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::Unverifiable(HashError::UnknownProfile(Profile::new(0x9999)))
        );
    }

    #[test]
    fn header_is_checked_against_target() {
        let engine = HashEngine::with_defaults().unwrap();
        let header = [0u8; 80];

        let digest = verify_header(&engine, &header, Profile::SCRYPT, &Target::MAX).unwrap();
        assert_eq!(digest, engine.hash(&header, Profile::SCRYPT).unwrap());

        let zero = Target::from_le_bytes([0; 32]);
        assert!(matches!(
            verify_header(&engine, &header, Profile::SCRYPT, &zero),
            Err(ValidationError::InsufficientWork { .. })
        ));
    }
}
